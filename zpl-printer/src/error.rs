//! Error types for the printer library

use thiserror::Error;

/// Raster / graphic field encoding errors
///
/// These indicate a contract violation by whoever produced the bitmap,
/// not a runtime condition worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Width or height is zero
    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer does not match width * height * 4
    #[error("Pixel buffer length mismatch: expected {expected}, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    /// A pre-packed `^GFA` literal could not be parsed
    #[error("Malformed graphic field: {0}")]
    MalformedGraphic(String),

    /// Document has no instructions
    #[error("Document has no instructions")]
    EmptyDocument,
}

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout while establishing the connection
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Bitmap could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Image decode failure
    #[cfg(feature = "image")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
