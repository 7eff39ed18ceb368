// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use blattwerk_core::error::Result;
use tracing::debug;

use crate::pdf::PageDocument;
use crate::validate;

/// Move the page at `from` into the slot before the page originally at `to`.
///
/// `to == page_count` moves the page to the end. Returns `false` when
/// `from == to`, in which case the document is left as it was.
pub fn move_page(doc: &mut PageDocument, from: i64, to: i64) -> Result<bool> {
    let count = doc.page_count();
    let from = validate::page_index(from, count)?;
    let to = validate::move_target(to, count)?;

    if from == to {
        return Ok(false);
    }

    let page = doc.remove_page(from)?;
    // Removing `from` shifts every later slot down by one.
    let at = if from < to { to - 1 } else { to };
    doc.insert_pages(at, vec![page]);

    debug!(from, to, at, "Page moved");
    Ok(true)
}
