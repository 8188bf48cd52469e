//! The document engine.
//!
//! The document set never looks inside PDF bytes itself. Decoding, page
//! rendering and page composition all go through a [`DocumentEngine`], so
//! the state manager can be driven by [`LopdfEngine`] in production and by
//! lightweight fakes in tests.

mod pdf;

pub use pdf::LopdfEngine;

use async_trait::async_trait;

/// Result type for engine calls.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Failure reported by a document engine.
///
/// The engine knows nothing about identities; the document set attaches them
/// when it maps these into [`PdfDeckError`](crate::PdfDeckError).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The bytes are not a document this engine can read.
    #[error("{reason}")]
    Decode {
        /// Engine-specific reason.
        reason: String,
    },

    /// A page could not be rendered.
    #[error("page {page}: {reason}")]
    Render {
        /// Page being rendered (1-based).
        page: u32,
        /// Engine-specific reason.
        reason: String,
    },

    /// A new document could not be composed.
    #[error("{reason}")]
    Compose {
        /// Index into the `sources` slice of the source that failed, if the
        /// failure belongs to one.
        input: Option<usize>,
        /// Engine-specific reason.
        reason: String,
    },
}

impl EngineError {
    /// Create a Decode error.
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Create a Compose error tied to one source.
    pub fn compose_input(input: usize, reason: impl Into<String>) -> Self {
        Self::Compose {
            input: Some(input),
            reason: reason.into(),
        }
    }

    /// Create a Compose error not tied to any source.
    pub fn compose(reason: impl Into<String>) -> Self {
        Self::Compose {
            input: None,
            reason: reason.into(),
        }
    }
}

/// What the engine learned from decoding a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    /// Number of pages, always at least one.
    pub page_count: u32,
    /// Version from the PDF header, e.g. `"1.7"`.
    pub version: String,
}

/// Pages to take from one source document when composing.
#[derive(Debug, Clone, Copy)]
pub struct PageSource<'a> {
    /// Raw bytes of the source document.
    pub bytes: &'a [u8],
    /// 1-based page numbers, in output order.
    pub pages: &'a [u32],
}

/// Capability that decodes, renders and composes PDF byte streams.
#[async_trait]
pub trait DocumentEngine: Send + Sync {
    /// Parse `bytes` and report the page count.
    async fn decode(&self, bytes: &[u8]) -> EngineResult<DecodedDocument>;

    /// Render one page (1-based) at `scale` into PNG bytes.
    async fn render_page(&self, bytes: &[u8], page: u32, scale: f32) -> EngineResult<Vec<u8>>;

    /// Build a new document from the listed pages of each source, in order.
    async fn compose(&self, sources: &[PageSource<'_>]) -> EngineResult<Vec<u8>>;
}
