//! Operations that build new documents out of loaded ones.
//!
//! Neither operation mutates its inputs. Both hand back an
//! [`ExportedDocument`] the caller can save, archive or load back into the
//! set.

mod merge;
mod split;

pub use merge::merge;
pub use split::{split, split_name};

/// File name given to merged output.
pub const MERGED_NAME: &str = "merged.pdf";

/// A named byte buffer ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    /// Suggested file name.
    pub name: String,
    /// Document bytes.
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    /// Create an export.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
