//! Declarative label templates
//!
//! Every product line is described as data: title, text anchoring, the
//! empirically tuned spacing between blocks, the body (detail rows or a
//! table) and the symbol payload format. The layout engine walks these; no
//! variant has its own cursor arithmetic.

use zpl_printer::TextOrigin;

use crate::record::{FieldKey, Variant};

/// Print density of the target printers (300 dpi)
pub const DOTS_PER_MM: f32 = 12.0;

/// Page width in dots (~98 mm)
pub const PAGE_WIDTH: u32 = 1181;

/// Page length in dots (~148 mm)
pub const PAGE_HEIGHT: u32 = 1772;

/// Title font height
pub const TITLE_FONT: u32 = 50;

/// Body font height
pub const BODY_FONT: u32 = 25;

/// Width of one icon slot in the icon row
pub const ICON_PITCH_MM: f32 = 3.395;

/// Nominal icon height; the row advances by this plus the same again as gap
pub const ICON_HEIGHT_MM: f32 = 3.295;

/// Millimeters to device dots
pub fn mm(value: f32) -> u32 {
    (value * DOTS_PER_MM).round() as u32
}

/// Left/right/top page margin
pub fn margin() -> u32 {
    mm(6.0)
}

/// How far the cursor moves after a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Fixed distance
    Mm(f32),
    /// Font height plus a gap (baseline-anchored layouts)
    Line { font: u32, gap_mm: f32 },
}

impl Advance {
    pub fn dots(self) -> u32 {
        match self {
            Advance::Mm(v) => mm(v),
            Advance::Line { font, gap_mm } => font + mm(gap_mm),
        }
    }
}

/// Fixed company text printed on every product label
#[derive(Debug, Clone, Copy)]
pub struct Letterhead {
    pub company: &'static str,
    pub street: &'static str,
    pub city: &'static str,
    pub country: &'static str,
    pub website: &'static str,
    pub tagline: &'static str,
}

pub const LETTERHEAD: Letterhead = Letterhead {
    company: "Rotoclear GmbH",
    street: "Carl-Benz-Strasse 10\u{2013}12",
    city: "69115 Heidelberg",
    country: "Germany",
    website: "www.rotoclear.com",
    tagline: "Designed and made in Germany",
};

/// Letterhead spacing
#[derive(Debug, Clone, Copy)]
pub struct LetterheadSpacing {
    /// After the title line
    pub title: Advance,
    /// After company, street and city
    pub address: Advance,
    /// After the country line
    pub country: Advance,
    /// After the website line
    pub website: Advance,
    /// Horizontal gap between the two icons
    pub icon_gap_mm: f32,
    /// After the tagline
    pub tagline: Advance,
}

/// Symbol edge length in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolSize {
    /// Use the configured size
    Configured,
    /// Pinned by the template
    Fixed(u32),
}

impl SymbolSize {
    pub fn resolve(self, configured: u32) -> u32 {
        match self {
            SymbolSize::Configured => configured,
            SymbolSize::Fixed(size) => size,
        }
    }
}

/// Three-column quantity/description/part-number table
#[derive(Debug, Clone, Copy)]
pub struct TableGeometry {
    pub quantity_width_mm: f32,
    pub quantity_gap_mm: f32,
    pub part_width_mm: f32,
    /// Part column overhangs the right margin by this much
    pub part_overhang_mm: f32,
    pub gutter_mm: f32,
    /// Rule below the header row
    pub rule_offset_mm: f32,
    pub rule_thickness: u32,
    /// Header row to first data row
    pub header_advance_mm: f32,
    pub row_pitch_mm: f32,
    pub description_caption: &'static str,
    pub part_caption: &'static str,
}

impl TableGeometry {
    pub fn part_width(&self) -> u32 {
        mm(self.part_width_mm)
    }

    pub fn part_x(&self) -> u32 {
        PAGE_WIDTH - margin() - self.part_width() + mm(self.part_overhang_mm)
    }

    pub fn quantity_width(&self) -> u32 {
        mm(self.quantity_width_mm)
    }

    pub fn description_x(&self) -> u32 {
        margin() + self.quantity_width() + mm(self.quantity_gap_mm)
    }

    pub fn description_width(&self) -> u32 {
        let left_area = self.part_x() - margin();
        left_area - self.quantity_width() - mm(self.quantity_gap_mm) - mm(self.gutter_mm)
    }
}

/// Variable part of a product label below the letterhead
#[derive(Debug, Clone, Copy)]
pub enum Body {
    /// `Caption: value` rows
    Details {
        rows: &'static [FieldKey],
        pitch: Advance,
    },
    /// One table row per record entry
    Table(TableGeometry),
}

/// How the symbol text is composed
#[derive(Debug, Clone, Copy)]
pub enum PayloadFormat {
    /// `label: value` lines
    Labeled {
        lines: &'static [(&'static str, FieldKey)],
        /// Keys that are left out when empty
        optional: &'static [FieldKey],
        separator: &'static str,
        /// Whether the last line keeps its separator
        trailing: bool,
    },
    /// Delivery-note header followed by `part - description - qty` lines
    Delivery { header: &'static str },
    /// `part - qty[ (serial)]` lines
    Contents,
}

/// Letterhead-style product label
#[derive(Debug, Clone, Copy)]
pub struct ProductTemplate {
    pub title: &'static str,
    pub origin: TextOrigin,
    /// Extra offset of the first line below the top margin
    pub top_offset_mm: f32,
    pub spacing: LetterheadSpacing,
    pub symbol: SymbolSize,
    /// Symbol top edge below the top margin
    pub symbol_offset_mm: f32,
    pub body: Body,
    pub payload: PayloadFormat,
}

/// A positioned text with fixed page coordinates
#[derive(Debug, Clone, Copy)]
pub struct FixedText {
    pub x: u32,
    pub y: u32,
    pub font: u32,
}

/// Simple carton label with absolute positions
#[derive(Debug, Clone, Copy)]
pub struct CartonTemplate {
    pub title: &'static str,
    pub title_at: FixedText,
    pub symbol_at: (u32, u32),
    pub symbol: SymbolSize,
    pub date_at: FixedText,
    /// Date format of the packaging date line
    pub date_format: &'static str,
    pub delivery_note_at: FixedText,
    /// Shift of everything below the delivery note when one is printed
    pub delivery_note_shift: u32,
    pub contents_caption: &'static str,
    pub contents_caption_at: FixedText,
    pub contents_at: FixedText,
    pub contents_width: u32,
    pub contents_max_lines: u32,
    pub part_pad: usize,
    pub description_pad: usize,
    pub website_at: FixedText,
    pub tagline_at: FixedText,
    pub payload: PayloadFormat,
}

/// Control unit label with absolute positions
///
/// Symbol top-left, detail rows to its right, address block and footer
/// below.
#[derive(Debug, Clone, Copy)]
pub struct UnitTemplate {
    pub title: &'static str,
    pub title_at: FixedText,
    pub symbol_at: (u32, u32),
    pub symbol: SymbolSize,
    pub rows: &'static [FieldKey],
    /// First detail row
    pub rows_at: FixedText,
    pub row_pitch: u32,
    /// Company line; street, city and country follow
    pub address_at: FixedText,
    pub address_pitch: u32,
    pub website_at: FixedText,
    pub tagline_at: FixedText,
    pub payload: PayloadFormat,
}

/// Template for one variant
#[derive(Debug, Clone, Copy)]
pub enum LabelTemplate {
    Product(ProductTemplate),
    Unit(UnitTemplate),
    Carton(CartonTemplate),
}

impl LabelTemplate {
    pub fn payload(&self) -> PayloadFormat {
        match self {
            LabelTemplate::Product(t) => t.payload,
            LabelTemplate::Unit(t) => t.payload,
            LabelTemplate::Carton(t) => t.payload,
        }
    }

    pub fn symbol_size(&self, configured: u32) -> u32 {
        match self {
            LabelTemplate::Product(t) => t.symbol.resolve(configured),
            LabelTemplate::Unit(t) => t.symbol.resolve(configured),
            LabelTemplate::Carton(t) => t.symbol.resolve(configured),
        }
    }
}

const DETAIL_ROWS: &[FieldKey] = &[
    FieldKey::ArticleNumber,
    FieldKey::Description,
    FieldKey::SerialNumber,
    FieldKey::PackagingDate,
];

/// Tagged payload lines keep a space before the newline
const TAG_SEPARATOR: &str = " \n";

const SN: (&str, FieldKey) = ("SN", FieldKey::SerialNumber);
const ART: (&str, FieldKey) = ("ART", FieldKey::Description);
const ARTN: (&str, FieldKey) = ("ARTN", FieldKey::ArticleNumber);
const ELE: (&str, FieldKey) = ("ELE", FieldKey::ElectronicsSerial);
const DAT: (&str, FieldKey) = ("DAT", FieldKey::PackagingDate);

const fn line(gap_mm: f32) -> Advance {
    Advance::Line {
        font: BODY_FONT,
        gap_mm,
    }
}

const C_BASIC: ProductTemplate = ProductTemplate {
    title: "Rotoclear C Basic",
    origin: TextOrigin::Baseline,
    top_offset_mm: 3.0,
    spacing: LetterheadSpacing {
        title: Advance::Line {
            font: TITLE_FONT,
            gap_mm: 3.67,
        },
        address: line(2.0),
        country: line(3.17),
        website: line(6.54),
        icon_gap_mm: 2.0,
        tagline: line(11.3),
    },
    symbol: SymbolSize::Configured,
    symbol_offset_mm: 9.0,
    body: Body::Details {
        rows: DETAIL_ROWS,
        pitch: line(2.0),
    },
    payload: PayloadFormat::Labeled {
        lines: &[SN, ART, ARTN, ELE, ("SW", FieldKey::SoftwareVersion), DAT],
        optional: &[],
        separator: TAG_SEPARATOR,
        trailing: false,
    },
};

const CAMERA_HEAD: ProductTemplate = ProductTemplate {
    title: "Kamerakopf",
    spacing: LetterheadSpacing {
        address: line(1.0),
        website: line(3.54),
        ..C_BASIC.spacing
    },
    body: Body::Details {
        rows: DETAIL_ROWS,
        pitch: line(1.0),
    },
    payload: PayloadFormat::Labeled {
        lines: &[
            SN,
            ART,
            ARTN,
            ELE,
            ("OPT1", FieldKey::OpticSerial1),
            ("OPT2", FieldKey::OpticSerial2),
            ("FW", FieldKey::FirmwareVersion),
            DAT,
        ],
        optional: &[FieldKey::OpticSerial2],
        separator: TAG_SEPARATOR,
        trailing: true,
    },
    ..C_BASIC
};

const C_PRO: ProductTemplate = ProductTemplate {
    title: "Rotoclear C Pro",
    origin: TextOrigin::Top,
    top_offset_mm: 0.0,
    spacing: LetterheadSpacing {
        title: Advance::Mm(9.67),
        address: Advance::Mm(2.54),
        country: Advance::Mm(5.17),
        website: Advance::Mm(6.54),
        icon_gap_mm: 2.0,
        tagline: Advance::Mm(11.3),
    },
    symbol: SymbolSize::Fixed(340),
    symbol_offset_mm: 9.0,
    body: Body::Details {
        rows: DETAIL_ROWS,
        pitch: Advance::Mm(3.0),
    },
    payload: PayloadFormat::Labeled {
        lines: &[
            SN,
            ART,
            ARTN,
            ELE,
            ("MAC", FieldKey::MacAddress),
            ("HDD", FieldKey::DiskSerial),
            ("SW", FieldKey::SoftwareVersion),
            DAT,
        ],
        optional: &[],
        separator: TAG_SEPARATOR,
        trailing: true,
    },
};

const ACCESSORY: ProductTemplate = ProductTemplate {
    title: "Rotoclear C-Line",
    spacing: LetterheadSpacing {
        country: Advance::Mm(3.17),
        icon_gap_mm: 3.0,
        ..C_PRO.spacing
    },
    symbol: SymbolSize::Configured,
    body: Body::Table(TableGeometry {
        quantity_width_mm: 6.0,
        quantity_gap_mm: 3.0,
        part_width_mm: 28.0,
        part_overhang_mm: 5.0,
        gutter_mm: 1.0,
        rule_offset_mm: 3.0,
        rule_thickness: 2,
        header_advance_mm: 6.0,
        row_pitch_mm: 3.2,
        description_caption: "Artikel",
        part_caption: "Artikelnummer",
    }),
    payload: PayloadFormat::Delivery {
        header: "ZUBEHOER",
    },
    ..C_PRO
};

const fn at(x: u32, y: u32, font: u32) -> FixedText {
    FixedText { x, y, font }
}

const OUTER_CARTON: CartonTemplate = CartonTemplate {
    title: "Outer Karton Etikett",
    title_at: at(50, 30, 40),
    symbol_at: (50, 100),
    symbol: SymbolSize::Fixed(190),
    date_at: at(50, 300, 30),
    date_format: "%d.%m.%Y",
    delivery_note_at: at(50, 320, 25),
    delivery_note_shift: 20,
    contents_caption: "Inhalt:",
    contents_caption_at: at(50, 350, 25),
    contents_at: at(50, 390, 25),
    contents_width: 700,
    contents_max_lines: 10,
    part_pad: 10,
    description_pad: 40,
    website_at: at(50, 550, 25),
    tagline_at: at(750, 550, 25),
    payload: PayloadFormat::Contents,
};

const C2: UnitTemplate = UnitTemplate {
    title: "Rotoclear C2",
    title_at: at(50, 30, 40),
    symbol_at: (50, 100),
    symbol: SymbolSize::Fixed(190),
    rows: DETAIL_ROWS,
    rows_at: at(320, 110, 30),
    row_pitch: 40,
    address_at: at(50, 390, 30),
    address_pitch: 30,
    website_at: at(50, 550, 25),
    tagline_at: at(750, 550, 25),
    // `FDVerpackungsdatum` is the label existing scans expect
    payload: PayloadFormat::Labeled {
        lines: &[
            ("Serialnummer", FieldKey::SerialNumber),
            ("Artikel", FieldKey::Description),
            ("Elektronik", FieldKey::ElectronicsSerial),
            ("MAC", FieldKey::MacAddress),
            ("SW-Version", FieldKey::SoftwareVersion),
            ("FDVerpackungsdatum", FieldKey::PackagingDate),
        ],
        optional: &[],
        separator: "\n",
        trailing: false,
    },
};

/// Template for a variant
pub fn template_for(variant: Variant) -> LabelTemplate {
    match variant {
        Variant::CBasic => LabelTemplate::Product(C_BASIC),
        Variant::CameraHead => LabelTemplate::Product(CAMERA_HEAD),
        Variant::CPro => LabelTemplate::Product(C_PRO),
        Variant::C2 => LabelTemplate::Unit(C2),
        Variant::Accessory => LabelTemplate::Product(ACCESSORY),
        Variant::OuterCarton => LabelTemplate::Carton(OUTER_CARTON),
    }
}
