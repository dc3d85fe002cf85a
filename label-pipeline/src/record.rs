//! Inspection record handed over by the application
//!
//! The application has already authenticated and persisted the record; this
//! is the plain field data a label is printed from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zpl_printer::{normalize_ascii, normalize_mac_address};

use crate::error::{LabelError, LabelResult};

/// Product line a label is printed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Control unit, basic
    CBasic,
    /// Control unit, pro (adds MAC/HDD)
    CPro,
    /// Control unit, second generation
    C2,
    /// Camera head
    CameraHead,
    /// Accessory delivery (multi-entry table)
    Accessory,
    /// Outer carton (multi-entry list)
    OuterCarton,
}

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::CBasic,
        Variant::CPro,
        Variant::C2,
        Variant::CameraHead,
        Variant::Accessory,
        Variant::OuterCarton,
    ];
}

/// Semantic field names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    ArticleNumber,
    Description,
    SerialNumber,
    PackagingDate,
    ElectronicsSerial,
    MacAddress,
    DiskSerial,
    SoftwareVersion,
    FirmwareVersion,
    OpticSerial1,
    OpticSerial2,
    DeliveryNote,
}

impl FieldKey {
    /// Caption printed in front of the value
    pub fn caption(self) -> &'static str {
        match self {
            FieldKey::ArticleNumber => "Artikelnummer",
            FieldKey::Description => "Artikelbezeichnung",
            FieldKey::SerialNumber => "Seriennummer",
            FieldKey::PackagingDate => "Verpackungsdatum",
            FieldKey::ElectronicsSerial => "Seriennummer Elektronik",
            FieldKey::MacAddress => "MAC-Adresse",
            FieldKey::DiskSerial => "Seriennummer Festplatte",
            FieldKey::SoftwareVersion => "Softwareversion",
            FieldKey::FirmwareVersion => "Firmwareversion",
            FieldKey::OpticSerial1 => "Seriennummer Optik 1",
            FieldKey::OpticSerial2 => "Seriennummer Optik 2",
            FieldKey::DeliveryNote => "Lieferschein",
        }
    }
}

/// Field value as stored by the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Date(NaiveDate),
    Number(i64),
    Text(String),
}

impl FieldValue {
    /// Render with the given chrono date format
    pub fn render(&self, date_format: &str) -> String {
        match self {
            FieldValue::Date(d) => d.format(date_format).to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

/// One key/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelField {
    pub key: FieldKey,
    pub value: FieldValue,
}

impl LabelField {
    pub fn text(key: FieldKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: FieldValue::Text(value.into()),
        }
    }

    pub fn date(key: FieldKey, value: NaiveDate) -> Self {
        Self {
            key,
            value: FieldValue::Date(value),
        }
    }
}

/// One row of a multi-entry job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub quantity: u32,
    pub description: String,
    pub part_number: String,
    #[serde(default)]
    pub serial_number: Option<String>,
}

/// Everything one label is printed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub variant: Variant,
    pub fields: Vec<LabelField>,
    #[serde(default)]
    pub entries: Vec<TableEntry>,
}

/// ISO date as printed on product labels
pub const ISO_DATE: &str = "%Y-%m-%d";

impl InspectionRecord {
    pub fn new(variant: Variant, fields: Vec<LabelField>) -> Self {
        Self {
            variant,
            fields,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(mut self, entries: Vec<TableEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// First value for a key
    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    /// Rendered value for a key, dates as ISO
    pub fn text(&self, key: FieldKey) -> Option<String> {
        self.get(key).map(|v| v.render(ISO_DATE))
    }

    /// Non-empty rendered value, or a validation error naming the field
    pub(crate) fn required(&self, key: FieldKey) -> LabelResult<String> {
        self.text(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| LabelError::Validation(format!("{} is required", key.caption())))
    }

    /// Copy with every text run through the printer-safe normalizers
    ///
    /// MAC addresses get the hardware canonicalization, everything else the
    /// ASCII one. Dates and numbers pass unchanged.
    pub fn normalized(&self) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|f| {
                let value = match &f.value {
                    FieldValue::Text(s) if f.key == FieldKey::MacAddress => {
                        FieldValue::Text(normalize_mac_address(s))
                    }
                    FieldValue::Text(s) => FieldValue::Text(normalize_ascii(s)),
                    other => other.clone(),
                };
                LabelField { key: f.key, value }
            })
            .collect();

        let entries = self
            .entries
            .iter()
            .map(|e| TableEntry {
                quantity: e.quantity,
                description: normalize_ascii(&e.description),
                part_number: normalize_ascii(&e.part_number),
                serial_number: e
                    .serial_number
                    .as_deref()
                    .map(normalize_ascii)
                    .filter(|s| !s.is_empty()),
            })
            .collect();

        Self {
            variant: self.variant,
            fields,
            entries,
        }
    }
}
