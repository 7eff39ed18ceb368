// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Atomic page operations on in-memory documents. Each operation validates all
// of its inputs before the first mutation.

pub mod insert;
pub mod merge;
pub mod remove;
pub mod reorder;
pub mod rotate;
pub mod split;

pub use insert::{PendingInsert, insert_documents};
pub use merge::{PageSource, merge_into};
pub use remove::remove_pages;
pub use reorder::move_page;
pub use rotate::rotate_pages;
pub use split::split_document;
