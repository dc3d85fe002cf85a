//! Printer-safe text
//!
//! The resident font only renders printable ASCII. Everything that ends up
//! in a field goes through these helpers first:
//! - typographic dashes become `-`
//! - anything outside 0x20..=0x7E is dropped
//! - hardware addresses are canonicalized where possible

/// Replace en/em dashes, drop non-printable-ASCII, trim
pub fn normalize_ascii(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .filter(|c| (' '..='~').contains(c))
        .collect();

    cleaned.trim().to_string()
}

/// Canonicalize a MAC address to `AA:BB:CC:DD:EE:FF`
///
/// Best effort only: when the input does not contain exactly 12 hex digits
/// it falls back to the uppercased [`normalize_ascii`] form. Not a validator.
pub fn normalize_mac_address(s: &str) -> String {
    let hex: String = s
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if hex.len() != 12 {
        return normalize_ascii(s).to_uppercase();
    }

    hex.as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair).into_owned())
        .collect::<Vec<_>>()
        .join(":")
}

/// Whether a string survives [`normalize_ascii`] unchanged
pub fn is_printer_safe(s: &str) -> bool {
    normalize_ascii(s) == s
}
