// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use blattwerk_core::Position;
use blattwerk_core::error::Result;
use tracing::debug;

use crate::pdf::PageDocument;
use crate::position::resolve_insertion;
use crate::validate;

/// A loaded document waiting to be spliced into a base document.
pub struct PendingInsert {
    pub document: PageDocument,
    /// Relative to the base document's original page indices.
    pub position: Position,
}

/// Splice every pending document into `base`, all pages of each.
///
/// Positions address the base as it was before any insertion: an entry at
/// position `p` lands immediately before the page originally at `p`. Entries
/// are applied in ascending position order (ties keep list order) and a running
/// offset of already-inserted pages shifts each later entry.
pub fn insert_documents(base: &mut PageDocument, inserts: Vec<PendingInsert>) -> Result<usize> {
    validate::require_non_empty(&inserts, "insert", "document")?;

    let original_count = base.page_count();
    let mut planned: Vec<(usize, PageDocument)> = inserts
        .into_iter()
        .map(|insert| {
            (
                resolve_insertion(insert.position, original_count),
                insert.document,
            )
        })
        .collect();
    planned.sort_by_key(|(at, _)| *at);

    let mut offset = 0;
    for (at, source) in &planned {
        let indices: Vec<usize> = (0..source.page_count()).collect();
        let page_ids = base.import_pages(source, &indices)?;
        let inserted = page_ids.len();
        base.insert_pages(at + offset, page_ids);

        debug!(original_position = at, offset, inserted, "Document inserted");
        offset += inserted;
    }

    Ok(offset)
}
