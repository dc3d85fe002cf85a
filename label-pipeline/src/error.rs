//! Label job errors

use thiserror::Error;
use zpl_printer::{EncodingError, PrintError};

/// Errors surfaced to the caller of a label job
///
/// Every stage fails fast; nothing is printed once any of these is raised
/// before transmission.
#[derive(Debug, Error)]
pub enum LabelError {
    /// Missing or malformed record data
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 2D symbol could not be generated (e.g. payload too long)
    #[error("Symbol generation failed: {0}")]
    Symbol(String),

    /// Bitmap contract violation
    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    /// Printer could not be reached or the write failed
    #[error("Transport failed: {0}")]
    Transport(#[from] PrintError),
}

impl LabelError {
    /// Whether the job failed on the wire (caller may retry with backoff)
    pub fn is_transport(&self) -> bool {
        matches!(self, LabelError::Transport(_))
    }
}

/// Result type for label jobs
pub type LabelResult<T> = Result<T, LabelError>;
