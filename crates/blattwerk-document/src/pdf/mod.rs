// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: the document codec (lopdf) and the template renderer (printpdf).

pub mod pages;
pub mod template;

pub use pages::PageDocument;
pub use template::{PdfTemplateRenderer, TemplateRenderer};
