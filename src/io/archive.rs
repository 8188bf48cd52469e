//! ZIP packing of exported documents.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::utils::strip_pdf_extension;

/// File name given to archive exports.
pub const ARCHIVE_NAME: &str = "pdf_files.zip";

/// Pack `(name, bytes)` entries into a ZIP archive, in the order given.
///
/// Display names may collide. Later duplicates get a ` (2)`, ` (3)`, ...
/// suffix before the extension so no entry is lost.
pub fn build_archive<'a, I>(entries: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    // PDF streams are already compressed
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut used = HashSet::new();
    for (name, bytes) in entries {
        let entry_name = unique_name(name, &mut used);
        debug!(entry = %entry_name, size = bytes.len(), "Adding archive entry");

        zip.start_file(entry_name.as_str(), options)?;
        zip.write_all(bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}

fn unique_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }

    let base = strip_pdf_extension(name);
    let extension = &name[base.len()..];
    (2..)
        .map(|n| format!("{base} ({n}){extension}"))
        .find(|candidate| used.insert(candidate.clone()))
        .unwrap_or_else(|| name.to_string())
}
