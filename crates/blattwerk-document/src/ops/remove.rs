// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use blattwerk_core::DuplicateIndexPolicy;
use blattwerk_core::error::{EngineError, Result};
use tracing::{debug, warn};

use crate::pdf::PageDocument;
use crate::validate;

/// Remove the pages at `indices`, returning how many pages were removed.
///
/// Pages go in descending index order so that removing a higher index never
/// shifts a lower one that is still pending.
pub fn remove_pages(
    doc: &mut PageDocument,
    indices: &[i64],
    duplicates: DuplicateIndexPolicy,
) -> Result<usize> {
    validate::require_non_empty(indices, "remove", "page index")?;

    let mut resolved = validate::page_indices(indices, doc.page_count())?;
    resolved.sort_unstable_by(|a, b| b.cmp(a));

    match duplicates {
        DuplicateIndexPolicy::Reject => {
            if let Some(pair) = resolved.windows(2).find(|pair| pair[0] == pair[1]) {
                return Err(EngineError::DuplicatePageIndex {
                    index: pair[0] as i64,
                });
            }
        }
        DuplicateIndexPolicy::Dedupe => {
            let listed = resolved.len();
            resolved.dedup();
            if resolved.len() < listed {
                warn!(
                    listed,
                    distinct = resolved.len(),
                    "Duplicate page indices removed once"
                );
            }
        }
    }

    for &index in &resolved {
        doc.remove_page(index)?;
    }

    debug!(
        removed = resolved.len(),
        remaining = doc.page_count(),
        "Pages removed"
    );
    Ok(resolved.len())
}
