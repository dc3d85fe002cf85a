//! ZPL command builder and page documents
//!
//! Provides a fluent API for building ZPL label formats, plus the
//! positioned [`PageInstruction`] model that the layout side produces.

use tracing::instrument;

use crate::error::EncodingError;
use crate::raster::PackedBitmap;

/// Font alias used for every text field
pub const FONT_ALIAS: char = 'Z';

/// Scalable font stored on the printer's E: drive
pub const FONT_FILE: &str = "E:TT0003M_.TTF";

/// Line separator between commands
const LINE_END: &str = "\r\n";

/// Where a text field's y coordinate points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextOrigin {
    /// Top-left corner of the field (`^FO`)
    #[default]
    Top,
    /// Left end of the text baseline (`^FT`)
    Baseline,
}

/// Field block justification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Center,
}

impl Justify {
    fn code(self) -> char {
        match self {
            Justify::Left => 'L',
            Justify::Center => 'C',
        }
    }
}

/// `^FB` field block: the printer wraps and clips text inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBlock {
    pub width: u32,
    pub max_lines: u32,
    pub justify: Justify,
}

impl FieldBlock {
    /// Single line block
    pub fn line(width: u32, justify: Justify) -> Self {
        Self {
            width,
            max_lines: 1,
            justify,
        }
    }
}

/// One positioned element on the page, in dots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageInstruction {
    Text {
        x: u32,
        y: u32,
        font_height: u32,
        content: String,
        origin: TextOrigin,
        block: Option<FieldBlock>,
    },
    Bitmap {
        x: u32,
        y: u32,
        bitmap: PackedBitmap,
    },
    GraphicBox {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        thickness: u32,
    },
}

impl PageInstruction {
    /// Plain top-anchored text
    pub fn text(x: u32, y: u32, font_height: u32, content: impl Into<String>) -> Self {
        PageInstruction::Text {
            x,
            y,
            font_height,
            content: content.into(),
            origin: TextOrigin::Top,
            block: None,
        }
    }

    /// Field origin
    pub fn origin(&self) -> (u32, u32) {
        match self {
            PageInstruction::Text { x, y, .. }
            | PageInstruction::Bitmap { x, y, .. }
            | PageInstruction::GraphicBox { x, y, .. } => (*x, *y),
        }
    }

    /// Nominal horizontal extent in dots
    ///
    /// Exact for bitmaps, boxes and field blocks. Free text is estimated
    /// with [`text_width`].
    pub fn nominal_width(&self) -> u32 {
        match self {
            PageInstruction::Text {
                font_height,
                content,
                block,
                ..
            } => match block {
                Some(b) => b.width,
                None => text_width(content, *font_height),
            },
            PageInstruction::Bitmap { bitmap, .. } => bitmap.dot_width() as u32,
            PageInstruction::GraphicBox { width, .. } => *width,
        }
    }
}

/// Estimated printed width of one line of free text
///
/// Half the font height per character, which is what the scalable font
/// averages for mixed-case Latin text.
pub fn text_width(content: &str, font_height: u32) -> u32 {
    (content.chars().count() as u32 * font_height).div_ceil(2)
}

/// `^FD..^FS` for a text field
///
/// `^` and `~` would start a new command inside the data, so a field that
/// contains either is sent as hex escapes under `^FH` (indicator `_`).
fn field_data(content: &str) -> String {
    if !content.contains(['^', '~']) {
        return format!("^FD{}^FS", content);
    }

    let mut data = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match c {
            '^' => data.push_str("_5E"),
            '~' => data.push_str("_7E"),
            '_' => data.push_str("_5F"),
            other => data.push(other),
        }
    }
    format!("^FH^FD{}^FS", data)
}

/// ZPL command builder
///
/// Accumulates one command group per line; [`ZplBuilder::build`] joins
/// them with CRLF.
#[derive(Debug, Default)]
pub struct ZplBuilder {
    lines: Vec<String>,
}

impl ZplBuilder {
    pub fn new() -> Self {
        Self {
            lines: Vec::with_capacity(64),
        }
    }

    fn push(&mut self, line: String) -> &mut Self {
        self.lines.push(line);
        self
    }

    // === Format Control ===

    /// Start label format (^XA)
    pub fn start_format(&mut self) -> &mut Self {
        self.push("^XA".to_string())
    }

    /// End label format (^XZ)
    pub fn end_format(&mut self) -> &mut Self {
        self.push("^XZ".to_string())
    }

    /// UTF-8 character set (^CI28)
    pub fn utf8(&mut self) -> &mut Self {
        self.push("^CI28".to_string())
    }

    /// Normal print orientation (^PON)
    pub fn orientation_normal(&mut self) -> &mut Self {
        self.push("^PON".to_string())
    }

    /// Normal default field orientation (^FWN)
    pub fn field_orientation_normal(&mut self) -> &mut Self {
        self.push("^FWN".to_string())
    }

    /// Label home (^LH)
    pub fn label_home(&mut self, x: u32, y: u32) -> &mut Self {
        self.push(format!("^LH{},{}", x, y))
    }

    /// Print width in dots (^PW)
    pub fn print_width(&mut self, width: u32) -> &mut Self {
        self.push(format!("^PW{}", width))
    }

    /// Label length in dots (^LL)
    pub fn label_length(&mut self, height: u32) -> &mut Self {
        self.push(format!("^LL{}", height))
    }

    /// Label shift (^LS)
    pub fn label_shift(&mut self, shift: i32) -> &mut Self {
        self.push(format!("^LS{}", shift))
    }

    /// Bind a font alias to a font file (^CW)
    pub fn font_alias(&mut self, alias: char, file: &str) -> &mut Self {
        self.push(format!("^CW{},{}", alias, file))
    }

    // === Fields ===

    fn field_origin(origin: TextOrigin, x: u32, y: u32) -> String {
        match origin {
            TextOrigin::Top => format!("^FO{},{}", x, y),
            TextOrigin::Baseline => format!("^FT{},{}", x, y),
        }
    }

    /// Text field in the aliased font
    pub fn text(
        &mut self,
        x: u32,
        y: u32,
        origin: TextOrigin,
        font_height: u32,
        block: Option<FieldBlock>,
        content: &str,
    ) -> &mut Self {
        let mut line = Self::field_origin(origin, x, y);
        line.push_str(&format!(
            "^A{}N,{},{}",
            FONT_ALIAS, font_height, font_height
        ));
        if let Some(b) = block {
            line.push_str(&format!(
                "^FB{},{},0,{},0",
                b.width,
                b.max_lines,
                b.justify.code()
            ));
        }
        line.push_str(&field_data(content));
        self.push(line)
    }

    /// Graphic field (^GFA)
    pub fn graphic(&mut self, x: u32, y: u32, bitmap: &PackedBitmap) -> &mut Self {
        self.push(format!("^FO{},{}^GFA,{}^FS", x, y, bitmap))
    }

    /// Graphic box (^GB)
    pub fn graphic_box(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        thickness: u32,
    ) -> &mut Self {
        self.push(format!("^FO{},{}^GB{},{},{}^FS", x, y, width, height, thickness))
    }

    /// Emit one page instruction
    pub fn instruction(&mut self, instruction: &PageInstruction) -> &mut Self {
        match instruction {
            PageInstruction::Text {
                x,
                y,
                font_height,
                content,
                origin,
                block,
            } => self.text(*x, *y, *origin, *font_height, *block, content),
            PageInstruction::Bitmap { x, y, bitmap } => self.graphic(*x, *y, bitmap),
            PageInstruction::GraphicBox {
                x,
                y,
                width,
                height,
                thickness,
            } => self.graphic_box(*x, *y, *width, *height, *thickness),
        }
    }

    /// Page preamble: start, charset, orientation, home, page size, font
    pub fn preamble(&mut self, page_width: u32, page_height: u32) -> &mut Self {
        self.start_format()
            .utf8()
            .orientation_normal()
            .field_orientation_normal()
            .label_home(0, 0)
            .print_width(page_width)
            .label_length(page_height)
            .label_shift(0)
            .font_alias(FONT_ALIAS, FONT_FILE)
    }

    // === Build ===

    /// Join all commands with CRLF
    pub fn build(self) -> String {
        self.lines.join(LINE_END)
    }
}

/// Serialize instructions into a complete label format
///
/// Instruction order is kept as given; the printer draws sequentially.
#[instrument(skip(instructions), fields(count = instructions.len()))]
pub fn assemble(
    instructions: &[PageInstruction],
    page_width: u32,
    page_height: u32,
) -> Result<String, EncodingError> {
    if instructions.is_empty() {
        return Err(EncodingError::EmptyDocument);
    }

    let mut b = ZplBuilder::new();
    b.preamble(page_width, page_height);
    for instruction in instructions {
        b.instruction(instruction);
    }
    b.end_format();

    Ok(b.build())
}

/// A fully laid out page, ready to assemble
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDocument {
    width: u32,
    height: u32,
    instructions: Vec<PageInstruction>,
}

impl LabelDocument {
    pub fn new(width: u32, height: u32, instructions: Vec<PageInstruction>) -> Self {
        Self {
            width,
            height,
            instructions,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn instructions(&self) -> &[PageInstruction] {
        &self.instructions
    }

    /// Assemble into ZPL text
    pub fn assemble(&self) -> Result<String, EncodingError> {
        assemble(&self.instructions, self.width, self.height)
    }
}
