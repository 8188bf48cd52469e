//! A single loaded document.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::engine::DecodedDocument;
use crate::error::Result;
use crate::range;

/// A rendered page preview (PNG bytes), shared between the cache and callers.
pub type Thumbnail = Arc<[u8]>;

/// One document in a [`DocumentSet`](crate::DocumentSet).
///
/// The identity and bytes never change after loading. Split and merge build
/// new documents instead of touching existing records.
#[derive(Debug)]
pub struct DocumentRecord {
    identity: String,
    bytes: Vec<u8>,
    page_count: u32,
    pdf_version: String,
    display_name: String,
    page_selection: String,
    thumbnails: RwLock<BTreeMap<u32, Thumbnail>>,
}

impl DocumentRecord {
    pub(crate) fn new(identity: String, bytes: Vec<u8>, decoded: DecodedDocument) -> Self {
        Self {
            display_name: identity.clone(),
            identity,
            bytes,
            page_count: decoded.page_count,
            pdf_version: decoded.version,
            page_selection: String::new(),
            thumbnails: RwLock::new(BTreeMap::new()),
        }
    }

    /// Unique key of this document: its file name at load time.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Raw bytes of the source document.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// PDF header version reported by the engine.
    pub fn pdf_version(&self) -> &str {
        &self.pdf_version
    }

    /// User-facing name; starts out equal to the identity.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Display name without a trailing `.pdf`, used to derive export names.
    pub fn base_name(&self) -> &str {
        crate::utils::strip_pdf_extension(&self.display_name)
    }

    /// Current page selection text, exactly as the user typed it.
    pub fn page_selection(&self) -> &str {
        &self.page_selection
    }

    /// Pages to highlight for the current selection.
    pub fn selected_pages(&self) -> Result<BTreeSet<u32>> {
        range::selected_pages(&self.page_selection, self.page_count)
    }

    pub(crate) fn set_display_name(&mut self, name: String) {
        self.display_name = name;
    }

    pub(crate) fn set_page_selection(&mut self, expression: String) {
        self.page_selection = expression;
    }

    pub(crate) async fn cached_thumbnail(&self, page: u32) -> Option<Thumbnail> {
        self.thumbnails.read().await.get(&page).cloned()
    }

    pub(crate) async fn store_thumbnail(&self, page: u32, thumbnail: Thumbnail) {
        self.thumbnails.write().await.insert(page, thumbnail);
    }

    /// Number of pages with a cached preview.
    pub async fn cached_thumbnail_count(&self) -> usize {
        self.thumbnails.read().await.len()
    }

    /// Release the thumbnail cache. Called when the record leaves the set.
    pub(crate) fn dispose(&mut self) {
        self.thumbnails.get_mut().clear();
    }
}
