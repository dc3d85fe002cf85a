//! Layout engine
//!
//! Turns a normalized record plus its encoded symbol into positioned page
//! instructions. Product labels are laid out top to bottom with a single
//! `y` cursor in the left column; the symbol is anchored top-right,
//! independent of the cursor. Carton labels use absolute positions.
//!
//! There is no reflow and no collision detection: spacing comes from the
//! template. The only checks are that required data is present and that
//! every element's nominal extent stays on the page.

use tracing::instrument;
use zpl_printer::{
    FieldBlock, Justify, LabelDocument, PackedBitmap, PageInstruction, TextOrigin,
    normalize_ascii, text_width,
};

use crate::error::{LabelError, LabelResult};
use crate::icons::icons_for;
use crate::record::{FieldKey, InspectionRecord, TableEntry};
use crate::template::{
    BODY_FONT, Body, CartonTemplate, ICON_HEIGHT_MM, ICON_PITCH_MM, LETTERHEAD, LabelTemplate,
    PAGE_HEIGHT, PAGE_WIDTH, ProductTemplate, TITLE_FONT, TableGeometry, UnitTemplate, margin, mm,
    template_for,
};

/// Instruction list under construction
struct Page {
    origin: TextOrigin,
    items: Vec<PageInstruction>,
}

impl Page {
    fn new(origin: TextOrigin) -> Self {
        Self {
            origin,
            items: Vec::new(),
        }
    }

    fn text(&mut self, x: u32, y: u32, font: u32, content: impl Into<String>) {
        self.items.push(PageInstruction::Text {
            x,
            y,
            font_height: font,
            content: content.into(),
            origin: self.origin,
            block: None,
        });
    }

    fn block(&mut self, x: u32, y: u32, font: u32, block: FieldBlock, content: impl Into<String>) {
        self.items.push(PageInstruction::Text {
            x,
            y,
            font_height: font,
            content: content.into(),
            origin: self.origin,
            block: Some(block),
        });
    }

    fn bitmap(&mut self, x: u32, y: u32, bitmap: &PackedBitmap) {
        self.items.push(PageInstruction::Bitmap {
            x,
            y,
            bitmap: bitmap.clone(),
        });
    }

    fn rule(&mut self, x: u32, y: u32, width: u32, thickness: u32) {
        self.items.push(PageInstruction::GraphicBox {
            x,
            y,
            width,
            height: thickness,
            thickness,
        });
    }
}

/// Lay out a normalized record
#[instrument(skip_all, fields(variant = ?record.variant))]
pub fn layout(
    record: &InspectionRecord,
    symbol: &PackedBitmap,
) -> LabelResult<Vec<PageInstruction>> {
    let instructions = match template_for(record.variant) {
        LabelTemplate::Product(template) => layout_product(record, symbol, &template)?,
        LabelTemplate::Unit(template) => layout_unit(record, symbol, &template)?,
        LabelTemplate::Carton(template) => layout_carton(record, symbol, &template)?,
    };

    check_bounds(&instructions, PAGE_WIDTH, PAGE_HEIGHT)?;
    tracing::debug!(count = instructions.len(), "Layout complete");
    Ok(instructions)
}

/// Lay out a normalized record into a full-page document
pub fn layout_document(
    record: &InspectionRecord,
    symbol: &PackedBitmap,
) -> LabelResult<LabelDocument> {
    let instructions = layout(record, symbol)?;
    Ok(LabelDocument::new(PAGE_WIDTH, PAGE_HEIGHT, instructions))
}

/// Every element's origin on the page and its nominal width inside it
pub fn check_bounds(instructions: &[PageInstruction], width: u32, height: u32) -> LabelResult<()> {
    for instruction in instructions {
        let (x, y) = instruction.origin();
        let extent = instruction.nominal_width();
        if x.saturating_add(extent) > width {
            return Err(LabelError::Validation(format!(
                "element at ({}, {}) is {} dots wide and overruns the page width {}",
                x, y, extent, width
            )));
        }
        if y > height {
            return Err(LabelError::Validation(format!(
                "element at ({}, {}) starts below the page length {}",
                x, y, height
            )));
        }
    }
    Ok(())
}

fn layout_product(
    record: &InspectionRecord,
    symbol: &PackedBitmap,
    template: &ProductTemplate,
) -> LabelResult<Vec<PageInstruction>> {
    let icons = icons_for(record.variant)
        .transpose()?
        .ok_or_else(|| LabelError::Validation(format!("{:?} has no icon set", record.variant)))?;
    let spacing = &template.spacing;
    let m = margin();
    let x = m;
    let mut y = m + mm(template.top_offset_mm);
    let mut page = Page::new(template.origin);

    // Header: title left, logo right on the same line
    page.text(x, y, TITLE_FONT, template.title);
    let head_y = match template.origin {
        TextOrigin::Top => y,
        TextOrigin::Baseline => y.checked_sub(TITLE_FONT).ok_or_else(|| {
            LabelError::Validation("header logo would start above the page".to_string())
        })?,
    };
    page.bitmap(PAGE_WIDTH - m - icons.head.dot_width() as u32, head_y, &icons.head);
    y += spacing.title.dots();

    // Address block
    for line in [LETTERHEAD.company, LETTERHEAD.street, LETTERHEAD.city] {
        page.text(x, y, BODY_FONT, normalize_ascii(line));
        y += spacing.address.dots();
    }
    page.text(x, y, BODY_FONT, normalize_ascii(LETTERHEAD.country));
    y += spacing.country.dots();

    page.text(x, y, BODY_FONT, normalize_ascii(LETTERHEAD.website));
    y += spacing.website.dots();

    // Conformity mark and info glyph side by side
    page.bitmap(x, y, &icons.mark);
    let info_x = x + mm(ICON_PITCH_MM) + mm(spacing.icon_gap_mm);
    page.bitmap(info_x, y, &icons.info);
    y += 2 * mm(ICON_HEIGHT_MM);

    page.text(x, y, BODY_FONT, normalize_ascii(LETTERHEAD.tagline));
    y += spacing.tagline.dots();

    // Symbol top-right, off the cursor
    let symbol_x = (PAGE_WIDTH - m)
        .checked_sub(symbol.dot_width() as u32)
        .ok_or_else(|| LabelError::Validation("symbol is wider than the page".to_string()))?;
    page.bitmap(symbol_x, m + mm(template.symbol_offset_mm), symbol);

    match template.body {
        Body::Details { rows, pitch } => {
            for key in rows {
                let value = record.required(*key)?;
                page.text(x, y, BODY_FONT, format!("{}: {}", key.caption(), value));
                y += pitch.dots();
            }
        }
        Body::Table(geometry) => table(&mut page, &record.entries, &geometry, y)?,
    }

    Ok(page.items)
}

fn table(
    page: &mut Page,
    entries: &[TableEntry],
    geometry: &TableGeometry,
    top: u32,
) -> LabelResult<()> {
    if entries.is_empty() {
        return Err(LabelError::Validation("at least one entry is required".to_string()));
    }

    let m = margin();
    let quantity_block = FieldBlock::line(geometry.quantity_width(), Justify::Left);
    let description_x = geometry.description_x();
    let description_width = geometry.description_width();
    let part_x = geometry.part_x();
    let part_block = FieldBlock::line(geometry.part_width(), Justify::Left);

    // Header row and rule
    page.block(
        description_x,
        top,
        BODY_FONT,
        FieldBlock::line(description_width, Justify::Center),
        geometry.description_caption,
    );
    page.block(part_x, top, BODY_FONT, part_block, geometry.part_caption);
    page.rule(
        m,
        top + mm(geometry.rule_offset_mm),
        PAGE_WIDTH - 2 * m,
        geometry.rule_thickness,
    );

    let first = top + mm(geometry.header_advance_mm);
    let pitch = mm(geometry.row_pitch_mm);
    let last = first + (entries.len() as u32 - 1) * pitch;
    if last + BODY_FONT > PAGE_HEIGHT {
        return Err(LabelError::Validation(format!(
            "{} entries do not fit on one label",
            entries.len()
        )));
    }

    for (i, entry) in entries.iter().enumerate() {
        let row_y = first + i as u32 * pitch;
        let quantity = format!("{}x", entry.quantity);
        page.block(m, row_y, BODY_FONT, quantity_block, quantity);
        page.block(
            description_x,
            row_y,
            BODY_FONT,
            FieldBlock::line(description_width, Justify::Left),
            entry.description.as_str(),
        );
        page.block(part_x, row_y, BODY_FONT, part_block, entry.part_number.as_str());
    }

    Ok(())
}

fn layout_carton(
    record: &InspectionRecord,
    symbol: &PackedBitmap,
    template: &CartonTemplate,
) -> LabelResult<Vec<PageInstruction>> {
    let entries = &record.entries;
    if entries.is_empty() {
        return Err(LabelError::Validation("at least one entry is required".to_string()));
    }
    let date = record
        .get(FieldKey::PackagingDate)
        .map(|v| v.render(template.date_format))
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            LabelError::Validation(format!("{} is required", FieldKey::PackagingDate.caption()))
        })?;
    let note = record
        .text(FieldKey::DeliveryNote)
        .filter(|v| !v.is_empty());

    let mut page = Page::new(TextOrigin::Top);
    let t = &template.title_at;
    page.text(t.x, t.y, t.font, template.title);

    let (sx, sy) = template.symbol_at;
    page.bitmap(sx, sy, symbol);

    let d = &template.date_at;
    page.text(
        d.x,
        d.y,
        d.font,
        format!("{}: {}", FieldKey::PackagingDate.caption(), date),
    );

    let shift = match &note {
        Some(note) => {
            let n = &template.delivery_note_at;
            page.text(
                n.x,
                n.y,
                n.font,
                format!("{}: {}", FieldKey::DeliveryNote.caption(), note),
            );
            template.delivery_note_shift
        }
        None => 0,
    };

    let c = &template.contents_caption_at;
    page.text(c.x, c.y + shift, c.font, template.contents_caption);

    let lines: Vec<String> = entries
        .iter()
        .map(|e| {
            let serial = e
                .serial_number
                .as_ref()
                .map(|sn| format!(" SN: {}", sn))
                .unwrap_or_default();
            format!(
                "{:<pw$} {:<dw$} Menge: {}{}",
                e.part_number,
                e.description,
                e.quantity,
                serial,
                pw = template.part_pad,
                dw = template.description_pad,
            )
        })
        .collect();

    // The printer wraps each entry inside the block and drops what is
    // past the last line
    let list = &template.contents_at;
    let printed: u32 = lines
        .iter()
        .map(|l| text_width(l, list.font).div_ceil(template.contents_width).max(1))
        .sum();
    if printed > template.contents_max_lines {
        return Err(LabelError::Validation(format!(
            "{} entries need {} lines, the contents block holds {}",
            entries.len(),
            printed,
            template.contents_max_lines
        )));
    }

    page.block(
        list.x,
        list.y + shift,
        list.font,
        FieldBlock {
            width: template.contents_width,
            max_lines: template.contents_max_lines,
            justify: Justify::Left,
        },
        // `\&` is the field block line break
        lines.join("\\&"),
    );

    let w = &template.website_at;
    page.text(w.x, w.y, w.font, normalize_ascii(LETTERHEAD.website));
    let g = &template.tagline_at;
    page.text(g.x, g.y, g.font, normalize_ascii(LETTERHEAD.tagline));

    Ok(page.items)
}

fn layout_unit(
    record: &InspectionRecord,
    symbol: &PackedBitmap,
    template: &UnitTemplate,
) -> LabelResult<Vec<PageInstruction>> {
    let mut page = Page::new(TextOrigin::Top);
    let t = &template.title_at;
    page.text(t.x, t.y, t.font, template.title);

    let (sx, sy) = template.symbol_at;
    page.bitmap(sx, sy, symbol);

    let r = &template.rows_at;
    for (i, key) in template.rows.iter().enumerate() {
        let value = record.required(*key)?;
        let y = r.y + i as u32 * template.row_pitch;
        page.text(r.x, y, r.font, format!("{}: {}", key.caption(), value));
    }

    let a = &template.address_at;
    let address = [
        LETTERHEAD.company,
        LETTERHEAD.street,
        LETTERHEAD.city,
        LETTERHEAD.country,
    ];
    for (i, line) in address.into_iter().enumerate() {
        let y = a.y + i as u32 * template.address_pitch;
        page.text(a.x, y, a.font, normalize_ascii(line));
    }

    let w = &template.website_at;
    page.text(w.x, w.y, w.font, normalize_ascii(LETTERHEAD.website));
    let g = &template.tagline_at;
    page.text(g.x, g.y, g.font, normalize_ascii(LETTERHEAD.tagline));

    Ok(page.items)
}
