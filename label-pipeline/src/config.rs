use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zpl_printer::{DEFAULT_DARK_THRESHOLD, DEFAULT_PORT, PrinterTarget};

use crate::symbol::{DEFAULT_SYMBOL_SIZE, Ecc};

/// Printer assigned to the label station
pub const DEFAULT_PRINTER_HOST: &str = "10.50.8.113";

/// Print pipeline configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | PRINTER_HOST | 10.50.8.113 | default printer IP |
/// | PRINTER_PORT | 9100 | raw socket port |
/// | PRINT_DARK_THRESHOLD | 128 | luminance threshold (0-255) |
/// | PRINT_SYMBOL_SIZE | 350 | symbol raster size in px |
/// | PRINT_SYMBOL_ECC | M | symbol ECC level L/M/Q/H |
/// | PRINT_GRACE_MS | 1000 | wait after the write before assuming success |
/// | PRINT_TIMEOUT_MS | 5000 | hard upper bound per job |
/// | PRINT_SERIALIZE_TARGETS | true | one job at a time per printer |
///
/// # Example
///
/// ```ignore
/// PRINTER_HOST=10.50.8.120 PRINT_GRACE_MS=1500 ./station
/// ```
#[derive(Debug, Clone)]
pub struct PrintConfig {
    /// Printer used when a job names none
    pub printer: PrinterTarget,
    /// Pixels darker than this print black
    pub dark_threshold: u8,
    /// Symbol edge length in pixels (templates may pin their own)
    pub symbol_size: u32,
    pub symbol_ecc: Ecc,
    /// Post-write grace timer (milliseconds)
    pub grace_ms: u64,
    /// Hard upper bound (milliseconds)
    pub timeout_ms: u64,
    /// Serialize jobs that share a printer address
    pub serialize_targets: bool,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl PrintConfig {
    /// Load from environment variables
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            printer: PrinterTarget::new(
                std::env::var("PRINTER_HOST").unwrap_or_else(|_| DEFAULT_PRINTER_HOST.into()),
                env_or("PRINTER_PORT", DEFAULT_PORT),
            ),
            dark_threshold: env_or("PRINT_DARK_THRESHOLD", DEFAULT_DARK_THRESHOLD),
            symbol_size: env_or("PRINT_SYMBOL_SIZE", DEFAULT_SYMBOL_SIZE),
            symbol_ecc: env_or("PRINT_SYMBOL_ECC", Ecc::M),
            grace_ms: env_or("PRINT_GRACE_MS", 1000),
            timeout_ms: env_or("PRINT_TIMEOUT_MS", 5000),
            serialize_targets: env_or("PRINT_SERIALIZE_TARGETS", true),
        }
    }

    /// Built-in defaults for a given printer, ignoring the environment
    ///
    /// Mostly for tests.
    pub fn for_target(printer: PrinterTarget) -> Self {
        Self {
            printer,
            dark_threshold: DEFAULT_DARK_THRESHOLD,
            symbol_size: DEFAULT_SYMBOL_SIZE,
            symbol_ecc: Ecc::M,
            grace_ms: 1000,
            timeout_ms: 5000,
            serialize_targets: true,
        }
    }

    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Per-job options supplied by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrintOptions {
    /// Printer override for this job
    #[serde(default)]
    pub target: Option<PrinterTarget>,
    /// Render everything, transmit nothing
    #[serde(default)]
    pub skip_print: bool,
}

impl PrintOptions {
    pub fn to(target: PrinterTarget) -> Self {
        Self {
            target: Some(target),
            skip_print: false,
        }
    }

    pub fn dry_run() -> Self {
        Self {
            target: None,
            skip_print: true,
        }
    }
}
