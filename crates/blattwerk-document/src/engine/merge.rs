// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Merge, Advanced Merge, and Template-Sequence Merge.

use blattwerk_core::error::Result;
use blattwerk_core::{CallId, MergeItem, MergeOptions, TemplateEntry, parse_items};
use tracing::{debug, info, instrument};

use super::PageEngine;
use crate::ops::{self, PageSource};
use crate::validate;

impl PageEngine {
    /// Concatenate whole documents in argument order.
    ///
    /// Placement goes through the same path as [`PageEngine::merge_advanced`],
    /// so `options.position` has no visible effect here either.
    #[instrument(skip_all, fields(call_id = %CallId::new(), documents = documents.len()))]
    pub async fn merge(&self, documents: &[&[u8]], options: MergeOptions) -> Result<Vec<u8>> {
        validate::require_non_empty(documents, "merge", "document")?;

        let mut sources = Vec::with_capacity(documents.len());
        for document in documents {
            sources.push(PageSource::all(self.load(document).await?));
        }

        let mut destination = self.new_document();
        let inserted = ops::merge_into(&mut destination, &sources, options.position)?;

        info!(documents = documents.len(), pages = inserted, "Merging PDFs");
        self.save(destination).await
    }

    /// Combine document page subsets and rendered template pages, in item
    /// order, into a new document.
    ///
    /// The whole batch is inserted at one point resolved against the
    /// destination. The destination here always starts empty, so `start`,
    /// `end`, and every index place the batch identically; order the items to
    /// control interleaving. Position only matters when the destination
    /// already has pages, as in [`PageEngine::merge_with_templates`].
    #[instrument(skip_all, fields(call_id = %CallId::new(), items = items.len()))]
    pub async fn merge_advanced(&self, items: &[MergeItem], options: MergeOptions) -> Result<Vec<u8>> {
        validate::require_non_empty(items, "mergeAdvanced", "item")?;

        let sources = self.resolve_items(items).await?;
        let mut destination = self.new_document();
        let inserted = ops::merge_into(&mut destination, &sources, options.position)?;

        info!(items = items.len(), pages = inserted, "Advanced merge complete");
        self.save(destination).await
    }

    /// [`PageEngine::merge_advanced`] driven by a JSON array of item descriptors.
    pub async fn merge_advanced_json(&self, items_json: &str, options: MergeOptions) -> Result<Vec<u8>> {
        let items = parse_items(items_json)?;
        self.merge_advanced(&items, options).await
    }

    /// Fold template insertions into `base`, one entry at a time.
    ///
    /// Each entry's rendered pages are inserted as one batch at the entry's
    /// position, resolved against the result of the previous entry.
    #[instrument(skip_all, fields(call_id = %CallId::new(), bytes_len = base.len(), entries = entries.len()))]
    pub async fn merge_with_templates(&self, base: &[u8], entries: &[TemplateEntry]) -> Result<Vec<u8>> {
        validate::require_non_empty(entries, "mergeWithTemplates", "template entry")?;

        let mut current = base.to_vec();
        for (step, entry) in entries.iter().enumerate() {
            let mut destination = self.load_owned(current).await?;
            let sources = self.render(&entry.layout, &entry.inputs).await?;
            let inserted = ops::merge_into(&mut destination, &sources, entry.position)?;

            debug!(step, position = ?entry.position, inserted, "Template entry merged");
            current = self.save(destination).await?;
        }

        info!(entries = entries.len(), "Template sequence merged");
        Ok(current)
    }

    async fn resolve_items(&self, items: &[MergeItem]) -> Result<Vec<PageSource>> {
        let mut sources = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            debug!(index, kind = item.kind(), "Resolving merge item");
            match item {
                MergeItem::Document { bytes, pages } => sources.push(PageSource {
                    document: self.load(bytes).await?,
                    pages: pages.clone(),
                }),
                MergeItem::Template { layout, inputs } => {
                    sources.extend(self.render(layout, inputs).await?);
                }
            }
        }
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use blattwerk_core::{EngineError, Position, TemplateLayout};
    use serde_json::json;

    use crate::testing::{engine, numbered, record, sample_pdf, sample_pdf_with_base, widths};

    use super::*;

    fn entry(inputs: Vec<blattwerk_core::Record>, position: Position) -> TemplateEntry {
        TemplateEntry {
            layout: TemplateLayout::default(),
            inputs,
            position,
        }
    }

    #[tokio::test]
    async fn merge_concatenates_in_argument_order() {
        let a = sample_pdf_with_base(2, 100);
        let b = sample_pdf_with_base(3, 200);
        let out = engine()
            .merge(&[&a, &b], MergeOptions::default())
            .await
            .unwrap();

        assert_eq!(widths(&out), vec![100, 101, 200, 201, 202]);
    }

    #[tokio::test]
    async fn split_then_merge_reconstructs_the_document() {
        let engine = engine();
        let original = sample_pdf(6);
        let parts = engine
            .split(
                &original,
                &[
                    blattwerk_core::PageRange::new(0, 0),
                    blattwerk_core::PageRange::new(1, 3),
                    blattwerk_core::PageRange::new(4, 5),
                ],
            )
            .await
            .unwrap();
        let refs: Vec<&[u8]> = parts.iter().map(Vec::as_slice).collect();

        let merged = engine.merge(&refs, MergeOptions::default()).await.unwrap();
        assert_eq!(widths(&merged), widths(&original));
    }

    #[tokio::test]
    async fn merge_with_nothing_is_empty_input() {
        let err = engine()
            .merge(&[], MergeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptyInput(_)));
    }

    #[tokio::test]
    async fn advanced_merge_with_no_items_is_empty_input() {
        let err = engine()
            .merge_advanced(&[], MergeOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.category(), "EmptyInput");
    }

    #[tokio::test]
    async fn advanced_merge_interleaves_documents_and_templates() {
        let items = vec![
            MergeItem::document_pages(sample_pdf_with_base(3, 100), vec![2, 0]),
            MergeItem::template(TemplateLayout::default(), vec![numbered(1), numbered(2)]),
            MergeItem::document(sample_pdf_with_base(1, 300)),
        ];
        let out = engine()
            .merge_advanced(&items, MergeOptions::default())
            .await
            .unwrap();

        assert_eq!(widths(&out), vec![102, 100, 501, 502, 300]);
    }

    #[tokio::test]
    async fn advanced_merge_ignores_position_for_new_document() {
        let engine = engine();
        let items = vec![
            MergeItem::document(sample_pdf_with_base(2, 100)),
            MergeItem::document(sample_pdf_with_base(1, 300)),
        ];

        let mut layouts = Vec::new();
        for position in [Position::Start, Position::End, Position::Index(5)] {
            let out = engine
                .merge_advanced(&items, MergeOptions { position })
                .await
                .unwrap();
            layouts.push(widths(&out));
        }
        assert!(layouts.iter().all(|l| *l == vec![100, 101, 300]));
    }

    #[tokio::test]
    async fn template_records_with_multiple_pages_are_copied_whole() {
        let items = vec![MergeItem::template(
            TemplateLayout::default(),
            vec![record(json!({"n": 10, "pages": 2})), numbered(40)],
        )];
        let out = engine()
            .merge_advanced(&items, MergeOptions::default())
            .await
            .unwrap();
        assert_eq!(widths(&out), vec![510, 511, 540]);
    }

    #[tokio::test]
    async fn advanced_merge_validates_page_selection() {
        let items = vec![MergeItem::document_pages(sample_pdf(2), vec![0, 4])];
        let err = engine()
            .merge_advanced(&items, MergeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidPageIndex { index: 4, .. }));
    }

    #[tokio::test]
    async fn advanced_merge_from_json_descriptors() {
        let doc = sample_pdf_with_base(2, 100);
        let json = serde_json::to_string(&json!([
            {"kind": "template", "layout": {}, "inputs": [{"n": 7}]},
            {"kind": "document", "bytes": doc, "pages": [1]},
        ]))
        .unwrap();

        let out = engine()
            .merge_advanced_json(&json, MergeOptions::default())
            .await
            .unwrap();
        assert_eq!(widths(&out), vec![507, 101]);

        let err = engine()
            .merge_advanced_json(r#"[{"kind": "photo"}]"#, MergeOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.category(), "UnknownActionType");
    }

    #[tokio::test]
    async fn template_entries_resolve_against_previous_result() {
        let base = sample_pdf(3);
        let out = engine()
            .merge_with_templates(
                &base,
                &[
                    entry(vec![numbered(1)], Position::Start),
                    // The base now has 4 pages; index 2 falls after original page 0.
                    entry(vec![numbered(2), numbered(3)], Position::Index(2)),
                    entry(vec![numbered(4)], Position::End),
                ],
            )
            .await
            .unwrap();

        assert_eq!(widths(&out), vec![501, 100, 502, 503, 101, 102, 504]);
    }

    #[tokio::test]
    async fn template_entry_without_inputs_leaves_base_unchanged() {
        let base = sample_pdf(2);
        let out = engine()
            .merge_with_templates(&base, &[entry(Vec::new(), Position::Start)])
            .await
            .unwrap();
        assert_eq!(widths(&out), vec![100, 101]);
    }

    #[tokio::test]
    async fn template_sequence_requires_entries() {
        let err = engine()
            .merge_with_templates(&sample_pdf(1), &[])
            .await
            .unwrap_err();
        assert_eq!(err.category(), "EmptyInput");
    }
}
