// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bounds validation. Every check here runs before an operation touches a
// document, so a failed call never leaves a partially mutated result behind.

use std::ops::RangeInclusive;

use blattwerk_core::PageRange;
use blattwerk_core::error::{EngineError, Result};

/// Fail with `EmptyInput` when an operation receives nothing to work on.
pub fn require_non_empty<T>(items: &[T], operation: &str, noun: &str) -> Result<()> {
    if items.is_empty() {
        return Err(EngineError::EmptyInput(format!(
            "{} requires at least one {}",
            operation, noun
        )));
    }
    Ok(())
}

/// A reference to an existing page: `0 <= index < page_count`.
pub fn page_index(index: i64, page_count: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&resolved| resolved < page_count)
        .ok_or(EngineError::InvalidPageIndex { index, page_count })
}

/// Validate every index, failing on the first one out of range.
pub fn page_indices(indices: &[i64], page_count: usize) -> Result<Vec<usize>> {
    indices
        .iter()
        .map(|&index| page_index(index, page_count))
        .collect()
}

/// Resolve open bounds and check `0 <= start <= end < page_count`.
pub fn page_range(range: &PageRange, page_count: usize) -> Result<RangeInclusive<usize>> {
    let start = range.start.unwrap_or(0);
    let end = range.end.unwrap_or(page_count as i64 - 1);
    let invalid = EngineError::InvalidRange {
        start,
        end,
        page_count,
    };

    if start > end {
        return Err(invalid);
    }
    match (page_index(start, page_count), page_index(end, page_count)) {
        (Ok(start), Ok(end)) => Ok(start..=end),
        _ => Err(invalid),
    }
}

/// Reduce a rotation modulo 360; the result must be a multiple of 90.
pub fn rotation(degrees: i64) -> Result<i64> {
    let normalized = degrees.rem_euclid(360);
    if normalized % 90 != 0 {
        return Err(EngineError::InvalidRotation(degrees));
    }
    Ok(normalized)
}

/// Destination of a move: a slot between pages, `0 <= to <= page_count`.
pub fn move_target(to: i64, page_count: usize) -> Result<usize> {
    usize::try_from(to)
        .ok()
        .filter(|&resolved| resolved <= page_count)
        .ok_or_else(|| {
            EngineError::InvalidPosition(format!(
                "move target {} outside 0..={} ({} page document)",
                to, page_count, page_count
            ))
        })
}
