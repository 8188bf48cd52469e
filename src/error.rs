//! Error types for pdfdeck.
//!
//! Every fallible operation in the crate returns [`PdfDeckError`]. The
//! variants fall into three groups:
//!
//! - **Document set errors**: duplicate identities, unknown identities,
//!   empty collections, bad move targets.
//! - **Page range errors**: empty or malformed expressions, pages that do
//!   not exist.
//! - **Engine and I/O errors**: the document engine failed to decode,
//!   compose or render, or the filesystem refused a read or write.
//!
//! None of these is fatal to a session. A failed operation always leaves
//! the [`DocumentSet`](crate::DocumentSet) exactly as it was before the call.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfdeck operations.
pub type Result<T> = std::result::Result<T, PdfDeckError>;

/// Main error type for pdfdeck operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfDeckError {
    /// A document with the same identity is already loaded.
    #[error("Document already loaded: {identity}")]
    DuplicateIdentity {
        /// Identity that is already present.
        identity: String,
    },

    /// No document with this identity is loaded.
    #[error("Document not found: {identity}")]
    NotFound {
        /// Identity that was looked up.
        identity: String,
    },

    /// A page range expression was empty or contained no tokens.
    #[error("No page ranges provided")]
    EmptyExpression,

    /// A page range token could not be parsed or is out of bounds.
    #[error(
        "Invalid page range: '{token}'\n  \
         Use page numbers like '5' or ranges like '1-3', separated by commas"
    )]
    InvalidRange {
        /// The offending token, trimmed.
        token: String,
    },

    /// A single page was requested that the document does not have.
    #[error(
        "Page {page} does not exist in {identity}\n  \
         Document has {page_count} page(s)"
    )]
    PageOutOfRange {
        /// Identity of the document.
        identity: String,
        /// Requested page (1-based).
        page: u32,
        /// Pages in the document.
        page_count: u32,
    },

    /// The document engine could not decode the bytes of a document.
    #[error("Failed to load PDF: {identity}\n  Reason: {reason}")]
    EngineLoad {
        /// Identity the document was being loaded as.
        identity: String,
        /// Engine-specific reason.
        reason: String,
    },

    /// The document engine could not compose a new document.
    #[error(
        "Failed to compose document{}\n  Reason: {reason}",
        .identity.as_deref().map(|id| format!(" from {id}")).unwrap_or_default()
    )]
    EngineCompose {
        /// Identity of the source that failed, when the engine could tell.
        identity: Option<String>,
        /// Engine-specific reason.
        reason: String,
    },

    /// The document engine could not render a page.
    #[error("Failed to render page {page} of {identity}\n  Reason: {reason}")]
    EngineRender {
        /// Identity of the document.
        identity: String,
        /// Page being rendered (1-based).
        page: u32,
        /// Engine-specific reason.
        reason: String,
    },

    /// The operation needs at least one loaded document.
    #[error("No documents loaded")]
    EmptyCollection,

    /// A move was requested on an empty collection.
    #[error("Cannot move to index {index}: no documents loaded")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
    },

    /// An input file could not be read.
    #[error("Failed to read input file: {}\n  Reason: {source}", .path.display())]
    FailedToReadInput {
        /// Path of the input.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An export could not be written.
    #[error("Failed to write output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output file already exists and overwriting is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Existing output path.
        path: PathBuf,
    },

    /// Building a ZIP archive failed.
    #[error("Failed to build archive: {reason}")]
    Archive {
        /// Details from the archive writer.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<zip::result::ZipError> for PdfDeckError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive {
            reason: err.to_string(),
        }
    }
}

impl PdfDeckError {
    /// Create a DuplicateIdentity error.
    pub fn duplicate_identity(identity: impl Into<String>) -> Self {
        Self::DuplicateIdentity {
            identity: identity.into(),
        }
    }

    /// Create a NotFound error.
    pub fn not_found(identity: impl Into<String>) -> Self {
        Self::NotFound {
            identity: identity.into(),
        }
    }

    /// Create an InvalidRange error for a token.
    pub fn invalid_range(token: impl Into<String>) -> Self {
        Self::InvalidRange {
            token: token.into(),
        }
    }

    /// Create an EngineLoad error.
    pub fn engine_load(identity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EngineLoad {
            identity: identity.into(),
            reason: reason.into(),
        }
    }

    /// Create an EngineCompose error.
    pub fn engine_compose(identity: Option<String>, reason: impl Into<String>) -> Self {
        Self::EngineCompose {
            identity,
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error can be reported to the user while the session
    /// carries on.
    ///
    /// Everything raised by the document set itself is recoverable; only
    /// output failures and cancellation end a CLI run.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::FailedToWrite { .. } | Self::Cancelled | Self::Io { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DuplicateIdentity { .. } => 1,
            Self::NotFound { .. } => 2,
            Self::EmptyExpression => 1,
            Self::InvalidRange { .. } => 1,
            Self::PageOutOfRange { .. } => 1,
            Self::EngineLoad { .. } => 3,
            Self::EngineCompose { .. } => 6,
            Self::EngineRender { .. } => 6,
            Self::EmptyCollection => 1,
            Self::IndexOutOfRange { .. } => 1,
            Self::FailedToReadInput { .. } => 2,
            Self::FailedToWrite { .. } => 5,
            Self::OutputExists { .. } => 4,
            Self::Archive { .. } => 6,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
