// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test fixtures. Each generated page has a distinct MediaBox width so tests
// can follow individual pages through reordering.

use std::sync::Arc;

use blattwerk_core::error::Result;
use blattwerk_core::{EngineConfig, Record, TemplateLayout};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use serde_json::{Value, json};

use crate::engine::PageEngine;
use crate::pdf::{PageDocument, TemplateRenderer};

/// `pages` pages with widths 100, 101, 102, ...
pub(crate) fn sample_pdf(pages: usize) -> Vec<u8> {
    sample_pdf_with_base(pages, 100)
}

/// `pages` pages with widths `base_width`, `base_width + 1`, ... sharing one font.
pub(crate) fn sample_pdf_with_base(pages: usize, base_width: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::with_capacity(pages);
    for page in 0..pages {
        let content = format!("BT /F1 12 Tf 10 10 Td (page {}) Tj ET", page);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(base_width + page as i64),
                Object::Integer(200),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut output = Vec::new();
    doc.save_to(&mut output).unwrap();
    output
}

pub(crate) fn widths_of(doc: &PageDocument) -> Vec<i64> {
    (0..doc.page_count())
        .map(|index| {
            let media_box = doc
                .page_dictionary(index)
                .unwrap()
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .unwrap();
            media_box[2].as_float().unwrap().round() as i64
        })
        .collect()
}

pub(crate) fn widths(bytes: &[u8]) -> Vec<i64> {
    widths_of(&PageDocument::from_bytes(bytes).unwrap())
}

pub(crate) fn rotations(bytes: &[u8]) -> Vec<i64> {
    let doc = PageDocument::from_bytes(bytes).unwrap();
    (0..doc.page_count())
        .map(|index| doc.rotation(index).unwrap())
        .collect()
}

pub(crate) fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap()
}

/// Record rendered by [`FixtureRenderer`] as pages of width `500 + n`.
pub(crate) fn numbered(n: i64) -> Record {
    record(json!({ "n": n }))
}

/// Renders `record["pages"]` pages (default 1) starting at width `500 + record["n"]`.
pub(crate) struct FixtureRenderer;

impl TemplateRenderer for FixtureRenderer {
    fn render(&self, _layout: &TemplateLayout, record: &Record) -> Result<Vec<u8>> {
        let n = record.get("n").and_then(Value::as_i64).unwrap_or(0);
        let pages = record.get("pages").and_then(Value::as_u64).unwrap_or(1);
        Ok(sample_pdf_with_base(pages as usize, 500 + n))
    }
}

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub(crate) fn engine() -> PageEngine {
    engine_with(EngineConfig::default())
}

pub(crate) fn engine_with(config: EngineConfig) -> PageEngine {
    init_tracing();
    PageEngine::with_renderer(config, Arc::new(FixtureRenderer))
}
