// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async page engine: the byte-buffer call surface.
//
// Each call loads its own document copies, suspends only while the codec or the
// template renderer runs on the blocking pool, and does all index arithmetic
// inline. Nothing is shared between calls except immutable configuration.

mod merge;
mod organize;

use std::sync::Arc;

use blattwerk_core::error::{EngineError, Result};
use blattwerk_core::{CallId, EngineConfig, InsertRequest, MoveRequest, PageRange, Record, TemplateLayout};
use tracing::{info, instrument};

use crate::ops::{self, PageSource, PendingInsert};
use crate::pdf::{PageDocument, PdfTemplateRenderer, TemplateRenderer};
use crate::validate;

/// Entry point for every page operation.
///
/// Cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct PageEngine {
    config: Arc<EngineConfig>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl PageEngine {
    /// Engine using the built-in printpdf template renderer.
    pub fn new(config: EngineConfig) -> Self {
        let renderer = Arc::new(PdfTemplateRenderer::new(config.default_paper_size));
        Self::with_renderer(config, renderer)
    }

    pub fn with_renderer(config: EngineConfig, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self {
            config: Arc::new(config),
            renderer,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -- Inspection -----------------------------------------------------------

    #[instrument(skip_all, fields(call_id = %CallId::new(), bytes_len = document.len()))]
    pub async fn page_count(&self, document: &[u8]) -> Result<usize> {
        Ok(self.load(document).await?.page_count())
    }

    /// Rotation of every page, in page order.
    #[instrument(skip_all, fields(call_id = %CallId::new(), bytes_len = document.len()))]
    pub async fn rotations(&self, document: &[u8]) -> Result<Vec<i64>> {
        let doc = self.load(document).await?;
        (0..doc.page_count()).map(|index| doc.rotation(index)).collect()
    }

    // -- Atomic operations ----------------------------------------------------

    /// One output document per range, in range order.
    #[instrument(skip_all, fields(call_id = %CallId::new(), bytes_len = document.len(), ranges = ranges.len()))]
    pub async fn split(&self, document: &[u8], ranges: &[PageRange]) -> Result<Vec<Vec<u8>>> {
        validate::require_non_empty(ranges, "split", "range")?;
        let source = self.load(document).await?;
        let parts = ops::split_document(&source, ranges, &self.config.pdf_version)?;

        info!(pages = source.page_count(), parts = parts.len(), "Splitting PDF");

        let mut outputs = Vec::with_capacity(parts.len());
        for part in parts {
            outputs.push(self.save(part).await?);
        }
        Ok(outputs)
    }

    #[instrument(skip_all, fields(call_id = %CallId::new(), bytes_len = document.len(), indices = indices.len()))]
    pub async fn remove(&self, document: &[u8], indices: &[i64]) -> Result<Vec<u8>> {
        validate::require_non_empty(indices, "remove", "page index")?;
        let mut doc = self.load(document).await?;
        let removed = ops::remove_pages(&mut doc, indices, self.config.duplicate_indices)?;

        info!(removed, remaining = doc.page_count(), "Pages removed");
        self.save(doc).await
    }

    /// Splice documents into `base`; positions refer to the original base.
    #[instrument(skip_all, fields(call_id = %CallId::new(), bytes_len = base.len(), inserts = inserts.len()))]
    pub async fn insert(&self, base: &[u8], inserts: &[InsertRequest]) -> Result<Vec<u8>> {
        validate::require_non_empty(inserts, "insert", "document")?;
        let mut doc = self.load(base).await?;

        let mut pending = Vec::with_capacity(inserts.len());
        for request in inserts {
            pending.push(PendingInsert {
                document: self.load(&request.document).await?,
                position: request.position,
            });
        }
        let inserted = ops::insert_documents(&mut doc, pending)?;

        info!(inserted, total = doc.page_count(), "Documents inserted");
        self.save(doc).await
    }

    /// Absolute rotation on `pages`, or on every page when `None`.
    #[instrument(skip_all, fields(call_id = %CallId::new(), bytes_len = document.len(), degrees = degrees))]
    pub async fn rotate(&self, document: &[u8], degrees: i64, pages: Option<&[i64]>) -> Result<Vec<u8>> {
        validate::rotation(degrees)?;
        let mut doc = self.load(document).await?;
        let normalized = ops::rotate_pages(&mut doc, degrees, pages)?;

        info!(normalized, "Pages rotated");
        self.save(doc).await
    }

    /// Relocate one page. `from == to` returns the input bytes unchanged.
    #[instrument(skip_all, fields(call_id = %CallId::new(), bytes_len = document.len(), from = request.from, to = request.to))]
    pub async fn move_page(&self, document: &[u8], request: MoveRequest) -> Result<Vec<u8>> {
        let mut doc = self.load(document).await?;
        if !ops::move_page(&mut doc, request.from, request.to)? {
            return Ok(document.to_vec());
        }

        info!("Page moved");
        self.save(doc).await
    }

    // -- Collaborator boundaries ----------------------------------------------

    fn new_document(&self) -> PageDocument {
        PageDocument::empty(&self.config.pdf_version)
    }

    async fn load(&self, data: &[u8]) -> Result<PageDocument> {
        self.load_owned(data.to_vec()).await
    }

    async fn load_owned(&self, data: Vec<u8>) -> Result<PageDocument> {
        run_blocking(move || PageDocument::from_bytes(&data)).await
    }

    async fn save(&self, document: PageDocument) -> Result<Vec<u8>> {
        let config = Arc::clone(&self.config);
        run_blocking(move || document.into_bytes(&config)).await
    }

    /// Render every record, in order, into page sources of all their pages.
    async fn render(&self, layout: &TemplateLayout, inputs: &[Record]) -> Result<Vec<PageSource>> {
        let mut sources = Vec::with_capacity(inputs.len());
        for record in inputs {
            let renderer = Arc::clone(&self.renderer);
            let layout = layout.clone();
            let record = record.clone();
            let bytes = run_blocking(move || renderer.render(&layout, &record)).await?;
            sources.push(PageSource::all(self.load_owned(bytes).await?));
        }
        Ok(sources)
    }
}

/// Run a codec or renderer call on the blocking pool.
async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(task))
        .await
        .map_err(|err| EngineError::Internal(format!("blocking task failed: {}", err)))?
}
