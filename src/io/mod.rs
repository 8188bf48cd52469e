//! Filesystem side of pdfdeck.
//!
//! The document set works on byte buffers only. This module reads input
//! files into buffers, writes exports back to disk and packs exports into
//! ZIP archives.

pub mod archive;
pub mod reader;
pub mod writer;

pub use archive::{ARCHIVE_NAME, build_archive};
pub use reader::{
    InputFile, InputReader, LoadFailure, LoadReport, LoadedInput, ReadStatistics,
};
pub use writer::{ExportWriter, WriteOptions, WriteStatistics};
