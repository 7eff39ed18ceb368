// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-document: page-level editing of PDF byte buffers.
//
// Merge, split, remove, insert, rotate, move, and organize pages, and merge
// template-rendered pages into existing documents.

pub mod engine;
pub mod ops;
pub mod pdf;
pub mod position;
pub mod validate;

#[cfg(test)]
mod testing;

// Re-export the primary structs so callers can use `blattwerk_document::PageEngine` etc.
pub use engine::PageEngine;
pub use pdf::{PageDocument, PdfTemplateRenderer, TemplateRenderer};
