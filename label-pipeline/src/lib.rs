//! # label-pipeline
//!
//! Compliance labels for inspected products, printed on Zebra printers.
//!
//! This crate decides WHAT goes on a label: the record model, per-product
//! templates, symbol payloads, the layout engine and job handling. The
//! bitmap format, ZPL and the socket live in `zpl-printer`.
//!
//! ## Example
//!
//! ```ignore
//! use label_pipeline::{InspectionRecord, LabelPrinter, PrintConfig, PrintOptions};
//!
//! let printer = LabelPrinter::new(PrintConfig::from_env());
//! let record: InspectionRecord = serde_json::from_str(&body)?;
//!
//! match printer.print(&record, &PrintOptions::default()).await {
//!     Ok(outcome) => tracing::info!(?outcome, "Label printed"),
//!     Err(e) if e.is_transport() => { /* caller decides on retry */ }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod icons;
pub mod layout;
pub mod locks;
pub mod logger;
pub mod record;
pub mod symbol;
pub mod template;

// Re-exports
pub use config::{PrintConfig, PrintOptions};
pub use error::{LabelError, LabelResult};
pub use executor::{LabelPrinter, PrintOutcome, RenderedLabel};
pub use layout::{layout, layout_document};
pub use record::{FieldKey, FieldValue, InspectionRecord, LabelField, TableEntry, Variant};
pub use symbol::{Ecc, compose_payload, render_symbol};
pub use template::{LabelTemplate, template_for};

pub use zpl_printer::{Completion, PrinterTarget};
