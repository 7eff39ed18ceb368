// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use blattwerk_core::error::Result;
use tracing::debug;

use crate::pdf::PageDocument;
use crate::validate;

/// Set an absolute rotation of `degrees mod 360` on the selected pages, or on
/// every page when `pages` is `None`. Returns the normalised rotation.
///
/// Prior rotation values are replaced, not added to.
pub fn rotate_pages(doc: &mut PageDocument, degrees: i64, pages: Option<&[i64]>) -> Result<i64> {
    let normalized = validate::rotation(degrees)?;
    let targets = match pages {
        Some(indices) => validate::page_indices(indices, doc.page_count())?,
        None => (0..doc.page_count()).collect(),
    };

    for &index in &targets {
        doc.set_rotation(index, normalized)?;
    }

    debug!(degrees, normalized, pages = targets.len(), "Pages rotated");
    Ok(normalized)
}
