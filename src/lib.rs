//! pdfdeck - Load, reorder, split, merge and export sets of PDF documents.
//!
//! The heart of the crate is [`DocumentSet`], an ordered collection of
//! loaded documents keyed by identity. On top of it sit:
//!
//! - A page range parser ([`range`]) for expressions like `"1-3,5,8-10"`
//! - Split and merge operations ([`ops`]) that build new documents
//! - A pluggable [`DocumentEngine`] with a `lopdf` implementation
//! - File reading, atomic writing and ZIP archiving ([`io`])
//! - The `pdfdeck` command-line front end ([`cli`], [`commands`])
//!
//! # Examples
//!
//! ## Managing a set
//!
//! ```no_run
//! use pdfdeck::DocumentSet;
//!
//! # async fn example() -> pdfdeck::Result<()> {
//! let mut set = DocumentSet::new();
//! set.load(std::fs::read("intro.pdf")?, "intro.pdf").await?;
//! set.load(std::fs::read("body.pdf")?, "body.pdf").await?;
//!
//! set.move_to("body.pdf", 0)?;
//! set.set_page_selection("intro.pdf", "1-2")?;
//!
//! let merged = set.merge().await?;
//! std::fs::write(&merged.name, &merged.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Parsing page ranges
//!
//! ```
//! use pdfdeck::range;
//!
//! let ranges = range::parse("8-10, 1-3, 5", 10).unwrap();
//! assert_eq!(ranges.len(), 3);
//! assert_eq!(range::normalize("3,1-2", 5).unwrap(), "1-3");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
mod collection;
pub mod commands;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod io;
pub mod ops;
pub mod output;
pub mod range;
pub mod set;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use document::{DocumentRecord, Thumbnail};
pub use engine::{DocumentEngine, LopdfEngine};
pub use error::{PdfDeckError, Result};
pub use ops::ExportedDocument;
pub use range::PageRange;
pub use set::{DocumentSet, SharedDocumentSet};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
