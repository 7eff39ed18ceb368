// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Template rendering: turn a declarative layout plus one input record into a
// finished PDF page using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: a page is a `PdfPage` holding a
// `Vec<Op>` operation list, serialised via `PdfDocument::save()`.

use blattwerk_core::error::Result;
use blattwerk_core::{PaperSize, Record, TemplateField, TemplateLayout};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use serde_json::Value;
use tracing::{debug, instrument};

/// Line height as a multiple of the font size.
const LINE_SPACING: f32 = 1.25;

/// Renders one input record against a layout into PDF bytes.
///
/// The engine calls `render` once per record, in record order, and copies
/// every page of the returned document.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, layout: &TemplateLayout, record: &Record) -> Result<Vec<u8>>;
}

/// Default renderer: one page per record, text fields in built-in Helvetica.
pub struct PdfTemplateRenderer {
    /// Paper size for layouts that do not name one.
    default_paper_size: PaperSize,
}

impl PdfTemplateRenderer {
    pub fn new(default_paper_size: PaperSize) -> Self {
        Self { default_paper_size }
    }

    pub fn a4() -> Self {
        Self::new(PaperSize::A4)
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self, layout: &TemplateLayout) -> (Mm, Mm) {
        let (w_mm, h_mm) = layout
            .paper_size
            .unwrap_or(self.default_paper_size)
            .dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }
}

impl Default for PdfTemplateRenderer {
    fn default() -> Self {
        Self::a4()
    }
}

impl TemplateRenderer for PdfTemplateRenderer {
    #[instrument(skip_all, fields(fields = layout.fields.len()))]
    fn render(&self, layout: &TemplateLayout, record: &Record) -> Result<Vec<u8>> {
        let (page_w, page_h) = self.page_dimensions(layout);
        let page_h_pt = page_h.into_pt().0;
        let title = layout.title.as_deref().unwrap_or("Blattwerk Template");

        let mut ops: Vec<Op> = Vec::new();
        for field in &layout.fields {
            push_field_ops(&mut ops, field, record, page_h_pt);
        }

        let mut doc = PdfDocument::new(title);
        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        debug!(
            output_bytes = output.len(),
            warnings = warnings.len(),
            "Template page rendered"
        );
        Ok(output)
    }
}

/// Text operations for one field, positioned from the top-left of the page.
fn push_field_ops(ops: &mut Vec<Op>, field: &TemplateField, record: &Record, page_h_pt: f32) {
    let value = field_text(record, &field.key);
    let text = match &field.label {
        Some(label) => format!("{}{}", label, value),
        None => value,
    };
    let lines = match field.wrap_chars {
        Some(width) if width > 0 => wrap_text(&text, width),
        _ => vec![text],
    };

    let x_pt = Mm(field.x_mm).into_pt().0;
    let top_pt = page_h_pt - Mm(field.y_mm).into_pt().0;
    let line_height_pt = field.font_size * LINE_SPACING;

    for (line_idx, line) in lines.into_iter().enumerate() {
        let y_pt = top_pt - (line_idx as f32 * line_height_pt);

        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(x_pt),
                y: Pt(y_pt),
            },
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(field.font_size),
            font: BuiltinFont::Helvetica,
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(line)],
            font: BuiltinFont::Helvetica,
        });
        ops.push(Op::EndTextSection);
    }
}

/// Record value as display text; missing keys and nulls render empty.
fn field_text(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

// -- Text wrapping helper -----------------------------------------------------

/// Wrap a multi-line string so that no line exceeds `max_width` characters.
///
/// Splits on existing newlines first, then performs simple word-wrap within each
/// paragraph. Words longer than `max_width` are force-broken.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            result.push(String::new());
            continue;
        }

        let mut current_line = String::with_capacity(max_width);

        for word in words {
            let mut remaining = word;
            while remaining.chars().count() > max_width {
                if !current_line.is_empty() {
                    result.push(std::mem::take(&mut current_line));
                }
                let split_at = remaining
                    .char_indices()
                    .nth(max_width)
                    .map(|(idx, _)| idx)
                    .unwrap_or(remaining.len());
                let (chunk, rest) = remaining.split_at(split_at);
                result.push(chunk.to_string());
                remaining = rest;
            }
            if remaining.is_empty() {
                continue;
            }

            if current_line.is_empty() {
                current_line.push_str(remaining);
            } else if current_line.chars().count() + 1 + remaining.chars().count() <= max_width {
                current_line.push(' ');
                current_line.push_str(remaining);
            } else {
                result.push(std::mem::take(&mut current_line));
                current_line.push_str(remaining);
            }
        }

        if !current_line.is_empty() {
            result.push(current_line);
        }
    }

    result
}
