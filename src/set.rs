//! The document set: an ordered collection of loaded documents.
//!
//! [`DocumentSet`] owns every loaded [`DocumentRecord`] and the order they
//! are shown and merged in. Records are keyed by identity, the file name a
//! document was loaded under. Display names are free-form and may collide.
//!
//! Every operation either succeeds completely or leaves the set exactly as
//! it was. Split, merge and export never modify loaded records; they return
//! an [`ExportedDocument`] instead.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::DocumentSet;
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> pdfdeck::Result<()> {
//! let mut set = DocumentSet::new();
//! set.load(a, "a.pdf").await?;
//! set.load(b, "b.pdf").await?;
//!
//! set.move_to("b.pdf", 0)?;
//! set.rename("a.pdf", "Appendix.pdf")?;
//!
//! let merged = set.merge().await?;
//! let excerpt = set.split("b.pdf", "1-3, 7").await?;
//! println!("{} and {}", merged.name, excerpt.name);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::collection::OrderedMap;
use crate::config::{Config, DEFAULT_THUMBNAIL_SCALE};
use crate::document::{DocumentRecord, Thumbnail};
use crate::engine::{DocumentEngine, EngineError, LopdfEngine, PageSource};
use crate::error::{PdfDeckError, Result};
use crate::io::{ARCHIVE_NAME, build_archive};
use crate::ops::{self, ExportedDocument};
use crate::range;

/// Ordered collection of loaded documents, driven by a [`DocumentEngine`].
#[derive(Debug)]
pub struct DocumentSet<E = LopdfEngine> {
    engine: E,
    records: OrderedMap<DocumentRecord>,
    thumbnail_scale: f32,
    workers: usize,
}

impl DocumentSet<LopdfEngine> {
    /// Create an empty set backed by [`LopdfEngine`].
    pub fn new() -> Self {
        Self::with_engine(LopdfEngine::new())
    }

    /// Create an empty set using the engine, preview scale and worker
    /// count from `config`.
    pub fn with_config(config: &Config) -> Self {
        Self::with_engine(config.engine())
            .with_thumbnail_scale(config.thumbnail_scale)
            .with_workers(config.effective_jobs())
    }
}

impl Default for DocumentSet<LopdfEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DocumentEngine> DocumentSet<E> {
    /// Create an empty set backed by `engine`.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            records: OrderedMap::new(),
            thumbnail_scale: DEFAULT_THUMBNAIL_SCALE,
            workers: 1,
        }
    }

    /// Scale used when rendering page previews.
    pub fn with_thumbnail_scale(mut self, scale: f32) -> Self {
        self.thumbnail_scale = scale;
        self
    }

    /// Number of previews rendered concurrently by [`thumbnails`](Self::thumbnails).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// The engine behind this set.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Decode `bytes` and append the document under `identity`.
    ///
    /// # Errors
    ///
    /// - [`PdfDeckError::DuplicateIdentity`] if `identity` is already loaded.
    /// - [`PdfDeckError::EngineLoad`] if the engine cannot decode the bytes.
    pub async fn load(
        &mut self,
        bytes: Vec<u8>,
        identity: impl Into<String>,
    ) -> Result<&DocumentRecord> {
        let identity = identity.into();

        if self.records.contains(&identity) {
            warn!(identity = %identity, "Rejected duplicate document");
            return Err(PdfDeckError::duplicate_identity(identity));
        }

        let decoded = self.engine.decode(&bytes).await.map_err(|err| {
            warn!(identity = %identity, error = %err, "Failed to decode document");
            PdfDeckError::engine_load(&identity, err.to_string())
        })?;

        debug!(
            identity = %identity,
            pages = decoded.page_count,
            version = %decoded.version,
            size = bytes.len(),
            "Loaded document"
        );

        let record = DocumentRecord::new(identity.clone(), bytes, decoded);
        self.records
            .push(identity.clone(), record)
            .map_err(|_| PdfDeckError::duplicate_identity(identity))
    }

    /// Remove a document and release its previews.
    ///
    /// Removing an identity that is not loaded does nothing. Returns whether
    /// a document was removed.
    pub fn remove(&mut self, identity: &str) -> bool {
        match self.records.remove(identity) {
            Some(mut record) => {
                record.dispose();
                debug!(identity, "Removed document");
                true
            }
            None => false,
        }
    }

    /// Move a document to `new_index`, clamped to the last position.
    ///
    /// Everything else keeps its relative order. Returns the final index.
    ///
    /// # Errors
    ///
    /// - [`PdfDeckError::IndexOutOfRange`] if the set is empty.
    /// - [`PdfDeckError::NotFound`] if `identity` is not loaded.
    pub fn move_to(&mut self, identity: &str, new_index: usize) -> Result<usize> {
        if self.records.is_empty() {
            return Err(PdfDeckError::IndexOutOfRange { index: new_index });
        }

        let index = self
            .records
            .move_to(identity, new_index)
            .ok_or_else(|| PdfDeckError::not_found(identity))?;

        debug!(identity, requested = new_index, index, "Moved document");
        Ok(index)
    }

    /// Change the display name. A name that is blank after trimming is
    /// ignored.
    pub fn rename(&mut self, identity: &str, new_display_name: &str) -> Result<()> {
        let record = self.require_mut(identity)?;

        let name = new_display_name.trim();
        if name.is_empty() {
            return Ok(());
        }

        debug!(identity, name, "Renamed document");
        record.set_display_name(name.to_string());
        Ok(())
    }

    /// Store a page selection without validating it.
    pub fn set_page_selection(&mut self, identity: &str, expression: impl Into<String>) -> Result<()> {
        self.require_mut(identity)?
            .set_page_selection(expression.into());
        Ok(())
    }

    /// The stored page selection, as typed.
    pub fn page_selection(&self, identity: &str) -> Result<&str> {
        Ok(self.require(identity)?.page_selection())
    }

    /// Pages the stored selection highlights. A blank selection highlights
    /// nothing.
    pub fn selected_pages(&self, identity: &str) -> Result<BTreeSet<u32>> {
        self.require(identity)?.selected_pages()
    }

    /// Flip one page in the stored selection and return the new selection.
    pub fn toggle_page(&mut self, identity: &str, page: u32) -> Result<String> {
        let record = self.require_mut(identity)?;
        let expression = range::toggle_page(record.page_selection(), page, record.page_count())?;
        record.set_page_selection(expression.clone());
        Ok(expression)
    }

    /// Identities in collection order.
    pub fn ordered_identities(&self) -> Vec<String> {
        self.records.keys().to_vec()
    }

    /// Look up a document.
    pub fn get(&self, identity: &str) -> Option<&DocumentRecord> {
        self.records.get(identity)
    }

    /// Whether a document is loaded under `identity`.
    pub fn contains(&self, identity: &str) -> bool {
        self.records.contains(identity)
    }

    /// Position of a document in collection order.
    pub fn index_of(&self, identity: &str) -> Option<usize> {
        self.records.position(identity)
    }

    /// Number of loaded documents.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in collection order.
    pub fn records(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records.values()
    }

    /// Total pages across all documents.
    pub fn total_pages(&self) -> u64 {
        self.records().map(|r| u64::from(r.page_count())).sum()
    }

    /// Build a new document from the pages `expression` selects.
    pub async fn split(&self, identity: &str, expression: &str) -> Result<ExportedDocument> {
        ops::split(&self.engine, self.require(identity)?, expression).await
    }

    /// Split a document and load the result into the set.
    ///
    /// The new document is appended under its suggested name, which is
    /// returned. Splitting the same selection twice fails with
    /// [`PdfDeckError::DuplicateIdentity`].
    pub async fn split_into_set(&mut self, identity: &str, expression: &str) -> Result<String> {
        let exported = self.split(identity, expression).await?;
        let record = self.load(exported.bytes, exported.name).await?;
        Ok(record.identity().to_string())
    }

    /// Concatenate every document in collection order.
    pub async fn merge(&self) -> Result<ExportedDocument> {
        let records: Vec<&DocumentRecord> = self.records().collect();
        ops::merge(&self.engine, &records).await
    }

    /// The original bytes of a document, named by its display name.
    pub fn export(&self, identity: &str) -> Result<ExportedDocument> {
        let record = self.require(identity)?;
        Ok(ExportedDocument::new(
            record.display_name(),
            record.bytes().to_vec(),
        ))
    }

    /// A one-page document holding `page`, named `<base name>-page-<page>.pdf`.
    pub async fn export_page(&self, identity: &str, page: u32) -> Result<ExportedDocument> {
        let record = self.require(identity)?;
        check_page(record, page)?;

        let pages = [page];
        let source = PageSource {
            bytes: record.bytes(),
            pages: &pages,
        };
        let bytes = self
            .engine
            .compose(std::slice::from_ref(&source))
            .await
            .map_err(|err| PdfDeckError::engine_compose(Some(identity.to_string()), err.to_string()))?;

        let name = format!("{}-page-{page}.pdf", record.base_name());
        info!(identity, page, name = %name, "Exported page");
        Ok(ExportedDocument::new(name, bytes))
    }

    /// A ZIP of every document, named by display name, in collection order.
    ///
    /// # Errors
    ///
    /// [`PdfDeckError::EmptyCollection`] if nothing is loaded.
    pub fn export_archive(&self) -> Result<ExportedDocument> {
        if self.is_empty() {
            return Err(PdfDeckError::EmptyCollection);
        }

        let bytes = build_archive(self.records().map(|r| (r.display_name(), r.bytes())))?;
        info!(documents = self.len(), size = bytes.len(), "Built archive");
        Ok(ExportedDocument::new(ARCHIVE_NAME, bytes))
    }

    /// Preview of one page as PNG, rendered on first request and cached.
    ///
    /// # Errors
    ///
    /// - [`PdfDeckError::PageOutOfRange`] for a page the document lacks.
    /// - [`PdfDeckError::EngineRender`] if the engine fails.
    pub async fn thumbnail(&self, identity: &str, page: u32) -> Result<Thumbnail> {
        let record = self.require(identity)?;
        self.render_thumbnail(record, page).await
    }

    /// Previews for several pages, rendered concurrently and returned in
    /// request order.
    pub async fn thumbnails(&self, identity: &str, pages: &[u32]) -> Result<Vec<Thumbnail>> {
        let record = self.require(identity)?;

        stream::iter(pages.iter().map(|&page| self.render_thumbnail(record, page)))
            .buffered(self.workers)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect()
    }

    async fn render_thumbnail(&self, record: &DocumentRecord, page: u32) -> Result<Thumbnail> {
        check_page(record, page)?;

        if let Some(cached) = record.cached_thumbnail(page).await {
            return Ok(cached);
        }

        let png = self
            .engine
            .render_page(record.bytes(), page, self.thumbnail_scale)
            .await
            .map_err(|err| {
                let reason = match err {
                    EngineError::Render { reason, .. } => reason,
                    other => other.to_string(),
                };
                PdfDeckError::EngineRender {
                    identity: record.identity().to_string(),
                    page,
                    reason,
                }
            })?;

        debug!(identity = record.identity(), page, size = png.len(), "Rendered preview");

        let thumbnail: Thumbnail = Arc::from(png);
        record.store_thumbnail(page, thumbnail.clone()).await;
        Ok(thumbnail)
    }

    fn require(&self, identity: &str) -> Result<&DocumentRecord> {
        self.records
            .get(identity)
            .ok_or_else(|| PdfDeckError::not_found(identity))
    }

    fn require_mut(&mut self, identity: &str) -> Result<&mut DocumentRecord> {
        self.records
            .get_mut(identity)
            .ok_or_else(|| PdfDeckError::not_found(identity))
    }
}

fn check_page(record: &DocumentRecord, page: u32) -> Result<()> {
    if page == 0 || page > record.page_count() {
        return Err(PdfDeckError::PageOutOfRange {
            identity: record.identity().to_string(),
            page,
            page_count: record.page_count(),
        });
    }
    Ok(())
}

/// Cloneable handle to a [`DocumentSet`] shared between tasks.
///
/// Mutations go through [`write`](Self::write), queries through
/// [`read`](Self::read); any number of readers may render previews at once.
#[derive(Debug)]
pub struct SharedDocumentSet<E = LopdfEngine> {
    inner: Arc<RwLock<DocumentSet<E>>>,
}

impl<E> Clone for SharedDocumentSet<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: DocumentEngine> SharedDocumentSet<E> {
    /// Wrap a set for sharing.
    pub fn new(set: DocumentSet<E>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(set)),
        }
    }

    /// Shared access for queries, previews, split and merge.
    pub async fn read(&self) -> RwLockReadGuard<'_, DocumentSet<E>> {
        self.inner.read().await
    }

    /// Exclusive access for load, remove, move, rename and selection edits.
    pub async fn write(&self) -> RwLockWriteGuard<'_, DocumentSet<E>> {
        self.inner.write().await
    }
}

impl<E: DocumentEngine> From<DocumentSet<E>> for SharedDocumentSet<E> {
    fn from(set: DocumentSet<E>) -> Self {
        Self::new(set)
    }
}
