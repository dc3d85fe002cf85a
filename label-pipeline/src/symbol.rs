//! 2D symbol rendering and payload composition

use std::fmt;
use std::str::FromStr;

use qrcode::{Color, EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zpl_printer::RasterImage;

use crate::error::{LabelError, LabelResult};
use crate::record::{FieldKey, InspectionRecord};
use crate::template::PayloadFormat;

/// Quiet zone around the symbol, in modules
pub const QUIET_ZONE: usize = 1;

/// Default symbol edge length in pixels
pub const DEFAULT_SYMBOL_SIZE: u32 = 350;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ecc {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<Ecc> for EcLevel {
    fn from(ecc: Ecc) -> Self {
        match ecc {
            Ecc::L => EcLevel::L,
            Ecc::M => EcLevel::M,
            Ecc::Q => EcLevel::Q,
            Ecc::H => EcLevel::H,
        }
    }
}

impl FromStr for Ecc {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Ecc::L),
            "M" => Ok(Ecc::M),
            "Q" => Ok(Ecc::Q),
            "H" => Ok(Ecc::H),
            other => Err(format!("unknown ECC level '{}'", other)),
        }
    }
}

impl fmt::Display for Ecc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            Ecc::L => "L",
            Ecc::M => "M",
            Ecc::Q => "Q",
            Ecc::H => "H",
        };
        f.write_str(level)
    }
}

/// Render a payload into a `pixel_size` x `pixel_size` black/white raster
///
/// Modules are scaled with integer arithmetic so the same input always
/// yields the same pixels. When the size is not a multiple of the module
/// count, some modules end up one pixel wider than others.
#[instrument(skip(payload), fields(payload_len = payload.len()))]
pub fn render_symbol(payload: &str, pixel_size: u32, ecc: Ecc) -> LabelResult<RasterImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), ecc.into())
        .map_err(|e| LabelError::Symbol(e.to_string()))?;

    let modules = code.width();
    let colors = code.to_colors();
    let span = modules + 2 * QUIET_ZONE;
    let size = pixel_size as usize;

    if size < span {
        return Err(LabelError::Symbol(format!(
            "{}px is too small for {} modules",
            pixel_size, span
        )));
    }

    let module_at = |p: u32| -> Option<usize> {
        let m = p as usize * span / size;
        (QUIET_ZONE..QUIET_ZONE + modules)
            .contains(&m)
            .then(|| m - QUIET_ZONE)
    };

    let image = RasterImage::from_fn(pixel_size, pixel_size, |x, y| {
        match (module_at(x), module_at(y)) {
            (Some(mx), Some(my)) if colors[my * modules + mx] == Color::Dark => BLACK,
            _ => WHITE,
        }
    })?;

    tracing::debug!(modules, pixel_size, %ecc, "Symbol rendered");
    Ok(image)
}

/// Compose the symbol text for a normalized record
pub fn compose_payload(record: &InspectionRecord, format: PayloadFormat) -> LabelResult<String> {
    match format {
        PayloadFormat::Labeled {
            lines: labeled,
            optional,
            separator,
            trailing,
        } => {
            let mut lines = Vec::with_capacity(labeled.len());
            for &(label, key) in labeled {
                if optional.contains(&key) && record.text(key).is_none_or(|v| v.is_empty()) {
                    continue;
                }
                lines.push(format!("{}: {}", label, record.required(key)?));
            }

            let mut payload = lines.join(separator);
            if trailing {
                payload.push_str(separator);
            }
            Ok(payload)
        }
        PayloadFormat::Delivery { header } => {
            let note = record.required(FieldKey::DeliveryNote)?;
            if record.entries.is_empty() {
                return Err(LabelError::Validation("at least one entry is required".to_string()));
            }

            let mut lines = vec![format!("{}: {} ", header, note)];
            lines.extend(
                record
                    .entries
                    .iter()
                    .map(|e| format!("{} - {} - {}", e.part_number, e.description, e.quantity)),
            );
            Ok(lines.join("\n"))
        }
        PayloadFormat::Contents => {
            if record.entries.is_empty() {
                return Err(LabelError::Validation("at least one entry is required".to_string()));
            }

            Ok(record
                .entries
                .iter()
                .map(|e| match &e.serial_number {
                    Some(sn) => format!("{} - {} ({})", e.part_number, e.quantity, sn),
                    None => format!("{} - {}", e.part_number, e.quantity),
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{LabelField, TableEntry, Variant};
    use crate::template::template_for;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn entry(quantity: u32, description: &str, part: &str, serial: Option<&str>) -> TableEntry {
        TableEntry {
            quantity,
            description: description.to_string(),
            part_number: part.to_string(),
            serial_number: serial.map(str::to_string),
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = render_symbol("SN: 1234 \nDAT: 2025-06-30", 350, Ecc::M).unwrap();
        let b = render_symbol("SN: 1234 \nDAT: 2025-06-30", 350, Ecc::M).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.width(), 350);
        assert_eq!(a.height(), 350);
    }

    #[test]
    fn test_render_quiet_zone_and_finder() {
        let image = render_symbol("hello", 250, Ecc::L).unwrap();
        // Version 1: 21 modules + 2 quiet = 23 units over 250 px
        assert_eq!(image.pixel(0, 0), WHITE);
        assert_eq!(image.pixel(249, 249), WHITE);
        // Top-left finder pattern corner is dark
        assert_eq!(image.pixel(12, 12), BLACK);
    }

    #[test]
    fn test_render_ecc_changes_output() {
        let m = render_symbol("payload", 200, Ecc::M).unwrap();
        let h = render_symbol("payload", 200, Ecc::H).unwrap();
        assert_ne!(m, h);
    }

    #[test]
    fn test_render_too_small() {
        let result = render_symbol("hello", 10, Ecc::M);
        assert!(matches!(result, Err(LabelError::Symbol(_))));
    }

    #[test]
    fn test_render_payload_too_long() {
        let payload = "x".repeat(5000);
        let result = render_symbol(&payload, 350, Ecc::H);
        assert!(matches!(result, Err(LabelError::Symbol(_))));
    }

    #[test]
    fn test_ecc_parse() {
        assert_eq!("q".parse::<Ecc>().unwrap(), Ecc::Q);
        assert_eq!(" H ".parse::<Ecc>().unwrap(), Ecc::H);
        assert!("X".parse::<Ecc>().is_err());
        assert_eq!(Ecc::default().to_string(), "M");
    }

    #[test]
    fn test_basic_payload_without_trailing_separator() {
        let record = InspectionRecord::new(
            Variant::CBasic,
            vec![
                LabelField::text(FieldKey::SerialNumber, "CB-1"),
                LabelField::text(FieldKey::Description, "C Basic"),
                LabelField::text(FieldKey::ArticleNumber, "10100"),
                LabelField::text(FieldKey::ElectronicsSerial, "E-9"),
                LabelField::text(FieldKey::SoftwareVersion, "2.1.0"),
                LabelField::date(FieldKey::PackagingDate, date()),
            ],
        );

        let payload = compose_payload(&record, template_for(Variant::CBasic).payload()).unwrap();
        assert_eq!(
            payload,
            "SN: CB-1 \nART: C Basic \nARTN: 10100 \nELE: E-9 \nSW: 2.1.0 \nDAT: 2025-06-30"
        );
    }

    #[test]
    fn test_camera_head_optional_optic() {
        let mut fields = vec![
            LabelField::text(FieldKey::SerialNumber, "KK-7"),
            LabelField::text(FieldKey::Description, "Kamerakopf"),
            LabelField::text(FieldKey::ArticleNumber, "10200"),
            LabelField::text(FieldKey::ElectronicsSerial, "E-1"),
            LabelField::text(FieldKey::OpticSerial1, "O-1"),
            LabelField::text(FieldKey::FirmwareVersion, "1.4"),
            LabelField::date(FieldKey::PackagingDate, date()),
        ];
        let format = template_for(Variant::CameraHead).payload();

        let without =
            compose_payload(&InspectionRecord::new(Variant::CameraHead, fields.clone()), format)
                .unwrap();
        assert_eq!(
            without,
            "SN: KK-7 \nART: Kamerakopf \nARTN: 10200 \nELE: E-1 \nOPT1: O-1 \nFW: 1.4 \n\
             DAT: 2025-06-30 \n"
        );

        fields.push(LabelField::text(FieldKey::OpticSerial2, "O-2"));
        let with =
            compose_payload(&InspectionRecord::new(Variant::CameraHead, fields), format).unwrap();
        assert!(with.contains("OPT1: O-1 \nOPT2: O-2 \nFW: 1.4"));
    }

    #[test]
    fn test_missing_required_field() {
        let record = InspectionRecord::new(
            Variant::CPro,
            vec![LabelField::text(FieldKey::SerialNumber, "CP-1")],
        );
        let result = compose_payload(&record, template_for(Variant::CPro).payload());
        assert!(matches!(result, Err(LabelError::Validation(_))));
    }

    #[test]
    fn test_delivery_payload() {
        let record = InspectionRecord::new(
            Variant::Accessory,
            vec![LabelField::text(FieldKey::DeliveryNote, "LS-2025-17")],
        )
        .with_entries(vec![
            entry(2, "Kabel 5 m", "10310", None),
            entry(1, "C-Extender", "10370", Some("EX-5")),
        ]);

        let payload = compose_payload(&record, template_for(Variant::Accessory).payload()).unwrap();
        assert_eq!(
            payload,
            "ZUBEHOER: LS-2025-17 \n10310 - Kabel 5 m - 2\n10370 - C-Extender - 1"
        );
    }

    #[test]
    fn test_delivery_requires_note_and_entries() {
        let format = template_for(Variant::Accessory).payload();

        let no_note = InspectionRecord::new(Variant::Accessory, vec![])
            .with_entries(vec![entry(1, "Kabel", "10310", None)]);
        assert!(matches!(
            compose_payload(&no_note, format),
            Err(LabelError::Validation(_))
        ));

        let no_entries = InspectionRecord::new(
            Variant::Accessory,
            vec![LabelField::text(FieldKey::DeliveryNote, "LS-1")],
        );
        assert!(matches!(
            compose_payload(&no_entries, format),
            Err(LabelError::Validation(_))
        ));
    }

    #[test]
    fn test_contents_payload() {
        let record = InspectionRecord::new(Variant::OuterCarton, vec![]).with_entries(vec![
            entry(1, "C Pro", "10500", Some("CP-9")),
            entry(3, "Kabel", "10310", None),
        ]);

        let payload =
            compose_payload(&record, template_for(Variant::OuterCarton).payload()).unwrap();
        assert_eq!(payload, "10500 - 1 (CP-9)\n10310 - 3");
    }

    #[test]
    fn test_c2_payload() {
        let record = InspectionRecord::new(
            Variant::C2,
            vec![
                LabelField::text(FieldKey::SerialNumber, "C2-0815"),
                LabelField::text(FieldKey::Description, "Rotoclear C2"),
                LabelField::text(FieldKey::ArticleNumber, "10600"),
                LabelField::text(FieldKey::ElectronicsSerial, "EL-12"),
                LabelField::text(FieldKey::MacAddress, "001a2b3c4d5e"),
                LabelField::text(FieldKey::SoftwareVersion, "1.0.3"),
                LabelField::date(FieldKey::PackagingDate, date()),
            ],
        )
        .normalized();

        let payload = compose_payload(&record, template_for(Variant::C2).payload()).unwrap();
        assert_eq!(
            payload,
            "Serialnummer: C2-0815\nArtikel: Rotoclear C2\nElektronik: EL-12\n\
             MAC: 00:1A:2B:3C:4D:5E\nSW-Version: 1.0.3\nFDVerpackungsdatum: 2025-06-30"
        );
    }

    #[test]
    fn test_c2_requires_mac() {
        let record = InspectionRecord::new(
            Variant::C2,
            vec![
                LabelField::text(FieldKey::SerialNumber, "C2-0815"),
                LabelField::text(FieldKey::Description, "Rotoclear C2"),
                LabelField::text(FieldKey::ElectronicsSerial, "EL-12"),
                LabelField::text(FieldKey::SoftwareVersion, "1.0.3"),
                LabelField::date(FieldKey::PackagingDate, date()),
            ],
        );

        let result = compose_payload(&record, template_for(Variant::C2).payload());
        assert!(matches!(result, Err(LabelError::Validation(msg)) if msg.contains("MAC")));
    }
}
