//! # zpl-printer
//!
//! ZPL label printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - Raster binarization into `^GFA` packed bitmaps
//! - ZPL command building and page assembly
//! - Printer-safe ASCII text
//! - Network printing (TCP port 9100) with heuristic completion
//!
//! Business logic (WHAT to print) lives in `label-pipeline`:
//! product templates, layout, symbols and job handling.
//!
//! ## Example
//!
//! ```ignore
//! use zpl_printer::{NetworkPrinter, PageInstruction, Printer, assemble};
//!
//! let zpl = assemble(&[PageInstruction::text(72, 72, 50, "Rotoclear C Pro")], 1181, 1772)?;
//!
//! let printer = NetworkPrinter::new("10.50.8.113", 9100)?;
//! let completion = printer.print(zpl.as_bytes()).await?;
//! ```

mod encoding;
mod error;
mod printer;
mod raster;
mod zpl;

// Re-exports
pub use encoding::{is_printer_safe, normalize_ascii, normalize_mac_address};
pub use error::{EncodingError, PrintError, PrintResult};
pub use printer::{
    Completion, DEFAULT_GRACE, DEFAULT_PORT, DEFAULT_TIMEOUT, NetworkPrinter, Printer,
    PrinterTarget,
};
pub use raster::{DEFAULT_DARK_THRESHOLD, PackedBitmap, RasterImage, encode, encode_rgba};
pub use zpl::{
    FONT_ALIAS, FONT_FILE, FieldBlock, Justify, LabelDocument, PageInstruction, TextOrigin,
    ZplBuilder, assemble, text_width,
};
