//! Label job executor
//!
//! Runs one job through Normalize -> Symbol/Layout -> Encode -> Assemble ->
//! Transmit. Every stage finishes before the next one starts, and nothing
//! goes on the wire unless all of them succeeded.

use serde::Serialize;
use tracing::{info, instrument, warn};
use zpl_printer::{Completion, LabelDocument, NetworkPrinter, Printer, PrinterTarget, encode};

use crate::config::{PrintConfig, PrintOptions};
use crate::error::{LabelError, LabelResult};
use crate::layout::layout_document;
use crate::locks::TargetLocks;
use crate::record::InspectionRecord;
use crate::symbol::{compose_payload, render_symbol};
use crate::template::template_for;

/// A label ready to send
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    /// Text encoded in the symbol
    pub payload: String,
    pub document: LabelDocument,
    /// Assembled ZPL
    pub zpl: String,
}

/// Result of a successful job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PrintOutcome {
    /// Written to the printer
    Sent {
        target: PrinterTarget,
        completion: Completion,
    },
    /// Dry run, nothing transmitted
    Skipped,
}

impl PrintOutcome {
    /// Whether the printer itself acknowledged the job
    pub fn is_confirmed(&self) -> bool {
        match self {
            PrintOutcome::Sent { completion, .. } => completion.is_confirmed(),
            PrintOutcome::Skipped => false,
        }
    }
}

/// Label job executor
///
/// Cheap to share behind an `Arc`; concurrent jobs only meet at the
/// per-printer lock.
#[derive(Debug, Clone)]
pub struct LabelPrinter {
    config: PrintConfig,
    locks: TargetLocks,
}

impl LabelPrinter {
    pub fn new(config: PrintConfig) -> Self {
        Self {
            config,
            locks: TargetLocks::new(),
        }
    }

    pub fn config(&self) -> &PrintConfig {
        &self.config
    }

    /// Render a record into a ready-to-send label
    ///
    /// Pure; touches no network.
    #[instrument(skip(self, record), fields(variant = ?record.variant))]
    pub fn render(&self, record: &InspectionRecord) -> LabelResult<RenderedLabel> {
        let record = record.normalized();
        let template = template_for(record.variant);

        let payload = compose_payload(&record, template.payload())?;
        let size = template.symbol_size(self.config.symbol_size);
        let image = render_symbol(&payload, size, self.config.symbol_ecc)?;
        let symbol = encode(&image, self.config.dark_threshold);

        let document = layout_document(&record, &symbol)?;
        let zpl = document.assemble()?;

        Ok(RenderedLabel {
            payload,
            document,
            zpl,
        })
    }

    /// Render and print a record
    #[instrument(
        skip(self, record, options),
        fields(variant = ?record.variant, dry_run = options.skip_print)
    )]
    pub async fn print(
        &self,
        record: &InspectionRecord,
        options: &PrintOptions,
    ) -> LabelResult<PrintOutcome> {
        let label = self.render(record)?;

        if options.skip_print {
            info!(bytes = label.zpl.len(), "Dry run, label not sent");
            return Ok(PrintOutcome::Skipped);
        }

        let target = options
            .target
            .clone()
            .unwrap_or_else(|| self.config.printer.clone());
        let completion = self.send(&label.zpl, &target).await?;

        Ok(PrintOutcome::Sent { target, completion })
    }

    /// Send assembled ZPL to a printer
    ///
    /// With target serialization on, waits for earlier jobs to the same
    /// printer first; the hard timeout starts once it is this job's turn.
    #[instrument(skip(self, zpl), fields(target = %target, bytes = zpl.len()))]
    pub async fn send(&self, zpl: &str, target: &PrinterTarget) -> LabelResult<Completion> {
        let printer = self.printer(target)?;

        let _turn = if self.config.serialize_targets {
            Some(self.locks.acquire(printer.addr()).await)
        } else {
            None
        };

        let completion = printer.print(zpl.as_bytes()).await?;
        if completion.is_confirmed() {
            info!(?completion, "Label sent");
        } else {
            warn!(?completion, "Label sent, printer did not respond");
        }

        Ok(completion)
    }

    /// Check whether a printer accepts connections
    pub async fn is_online(&self, target: Option<&PrinterTarget>) -> bool {
        let target = target.unwrap_or(&self.config.printer);
        match self.printer(target) {
            Ok(printer) => printer.is_online().await,
            Err(_) => false,
        }
    }

    fn printer(&self, target: &PrinterTarget) -> LabelResult<NetworkPrinter> {
        let printer = NetworkPrinter::from_target(target)
            .map_err(|e| LabelError::Validation(e.to_string()))?;
        Ok(printer
            .with_grace(self.config.grace())
            .with_timeout(self.config.timeout()))
    }
}

impl Default for LabelPrinter {
    fn default() -> Self {
        Self::new(PrintConfig::default())
    }
}
