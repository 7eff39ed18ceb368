// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use blattwerk_core::PageRange;
use blattwerk_core::error::Result;
use tracing::debug;

use crate::pdf::PageDocument;
use crate::validate;

/// One independent document per range, each holding `start..=end` in order.
///
/// All ranges are validated before any output is built.
pub fn split_document(
    source: &PageDocument,
    ranges: &[PageRange],
    version: &str,
) -> Result<Vec<PageDocument>> {
    validate::require_non_empty(ranges, "split", "range")?;

    let resolved = ranges
        .iter()
        .map(|range| validate::page_range(range, source.page_count()))
        .collect::<Result<Vec<_>>>()?;

    resolved
        .into_iter()
        .map(|range| {
            let indices: Vec<usize> = range.collect();
            let mut part = PageDocument::empty(version);
            let page_ids = part.import_pages(source, &indices)?;
            part.insert_pages(0, page_ids);
            debug!(
                first = ?indices.first(),
                last = ?indices.last(),
                "Split part built"
            );
            Ok(part)
        })
        .collect()
}
