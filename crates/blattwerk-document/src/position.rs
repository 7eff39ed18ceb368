// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Position resolution: symbolic insertion points to concrete indices.

use blattwerk_core::Position;

/// Resolve an insertion point against a document of `page_count` pages.
///
/// Explicit indices are clamped into `[0, page_count]` rather than rejected.
/// References to existing pages go through [`crate::validate::page_index`]
/// instead, which rejects out-of-range values.
pub fn resolve_insertion(position: Position, page_count: usize) -> usize {
    match position {
        Position::Start => 0,
        Position::End => page_count,
        Position::Index(index) if index <= 0 => 0,
        Position::Index(index) => usize::try_from(index)
            .map(|index| index.min(page_count))
            .unwrap_or(page_count),
    }
}
