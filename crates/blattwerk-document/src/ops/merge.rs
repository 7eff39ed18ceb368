// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use blattwerk_core::Position;
use blattwerk_core::error::Result;
use tracing::debug;

use crate::pdf::PageDocument;
use crate::position::resolve_insertion;
use crate::validate;

/// A loaded source of pages: selected `pages` in the listed order, or all.
pub struct PageSource {
    pub document: PageDocument,
    pub pages: Option<Vec<i64>>,
}

impl PageSource {
    pub fn all(document: PageDocument) -> Self {
        Self {
            document,
            pages: None,
        }
    }
}

/// Copy the selected pages of every source, in source order, into one batch
/// and insert the whole batch at a single point of `destination`.
///
/// `position` is resolved against the destination's page count at insertion
/// time. For an empty destination every position resolves to 0.
pub fn merge_into(
    destination: &mut PageDocument,
    sources: &[PageSource],
    position: Position,
) -> Result<usize> {
    let selections = sources
        .iter()
        .map(|source| match &source.pages {
            Some(pages) => validate::page_indices(pages, source.document.page_count()),
            None => Ok((0..source.document.page_count()).collect()),
        })
        .collect::<Result<Vec<Vec<usize>>>>()?;

    let mut batch = Vec::new();
    for (source, indices) in sources.iter().zip(&selections) {
        batch.extend(destination.import_pages(&source.document, indices)?);
    }

    let at = resolve_insertion(position, destination.page_count());
    let inserted = batch.len();
    destination.insert_pages(at, batch);

    debug!(sources = sources.len(), inserted, at, "Batch merged");
    Ok(inserted)
}
