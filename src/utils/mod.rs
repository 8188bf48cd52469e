//! Path discovery and naming helpers.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{PdfDeckError, Result};

/// Expand glob patterns into paths, keeping pattern order.
///
/// A pattern that matches nothing is an error, so a mistyped file name is
/// reported instead of silently dropped.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        resolved_paths.extend(collect_paths_for_pattern(pattern.as_ref())?);
    }

    Ok(resolved_paths)
}

fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    // Existing files are taken literally: `a-[1-2].pdf` is a name, not a class
    let literal = Path::new(pattern);
    if literal.is_file() {
        return Ok(vec![literal.to_path_buf()]);
    }

    let paths = glob::glob(pattern).map_err(|err| PdfDeckError::Other {
        message: format!("Invalid pattern '{pattern}': {err}"),
    })?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| PdfDeckError::FailedToReadInput {
            path: err.path().to_path_buf(),
            source: io::Error::new(err.error().kind(), err.error().to_string()),
        })?;
        if path.is_file() {
            resolved_paths.push(path);
        }
    }

    if resolved_paths.is_empty() {
        return Err(PdfDeckError::FailedToReadInput {
            path: PathBuf::from(pattern),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        });
    }

    Ok(resolved_paths)
}

/// Identity a file is loaded under: its file name.
pub fn identity_for_path(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Strip one trailing `.pdf` (any case) from a name.
pub fn strip_pdf_extension(name: &str) -> &str {
    let split = name.len().saturating_sub(4);
    match (name.get(..split), name.get(split..)) {
        (Some(base), Some(ext)) if ext.eq_ignore_ascii_case(".pdf") => base,
        _ => name,
    }
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
