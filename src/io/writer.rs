//! Writing exports to disk.
//!
//! This module provides safe export writing with:
//! - Atomic writes (write to temp file, then rename)
//! - Overwrite protection
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::io::ExportWriter;
//! use pdfdeck::ExportedDocument;
//! use std::path::Path;
//!
//! # async fn example(export: ExportedDocument) -> pdfdeck::Result<()> {
//! let writer = ExportWriter::new();
//! let stats = writer.save(&export.bytes, Path::new("out").join(&export.name).as_path()).await?;
//! println!("Wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::task;
use tracing::debug;

use crate::error::{PdfDeckError, Result};
use crate::utils::format_file_size;

/// Options for writing exports.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Replace an existing file at the target path.
    pub overwrite: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            overwrite: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes export bytes to disk.
#[derive(Debug, Clone, Default)]
pub struct ExportWriter {
    options: WriteOptions,
}

impl ExportWriter {
    /// Create a writer with default options: atomic, no overwrite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer that replaces existing files.
    pub fn overwriting() -> Self {
        Self {
            options: WriteOptions {
                overwrite: true,
                ..Default::default()
            },
        }
    }

    /// Write `bytes` to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists and overwriting is off ([`PdfDeckError::OutputExists`])
    /// - The output directory does not exist
    /// - The write or the final rename fails ([`PdfDeckError::FailedToWrite`])
    pub async fn save(&self, bytes: &[u8], path: &Path) -> Result<WriteStatistics> {
        if !self.options.overwrite && self.exists(path).await {
            return Err(PdfDeckError::output_exists(path.to_path_buf()));
        }
        self.can_write(path).await?;

        let path_buf = path.to_path_buf();
        let options = self.options.clone();
        let bytes = bytes.to_vec();

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();

            let write_path = if options.atomic {
                temp_path(&path_buf)
            } else {
                path_buf.clone()
            };

            write_file(&write_path, &bytes, options.buffer_size)?;

            if options.atomic
                && let Err(source) = std::fs::rename(&write_path, &path_buf)
            {
                let _ = std::fs::remove_file(&write_path);
                return Err(PdfDeckError::FailedToWrite {
                    path: path_buf,
                    source,
                });
            }

            Ok::<_, PdfDeckError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| PdfDeckError::other(format!("Write task failed: {e}")))??;

        debug!(
            path = %stats.output_path.display(),
            size = stats.file_size,
            "Export written"
        );
        Ok(stats)
    }

    /// Check that the parent directory of `path` exists and is writable.
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let metadata = tokio::fs::metadata(parent).await.map_err(|_| {
            PdfDeckError::invalid_config(format!(
                "Output directory does not exist: {}",
                parent.display()
            ))
        })?;

        if !metadata.is_dir() {
            return Err(PdfDeckError::invalid_config(format!(
                "Output path is not a directory: {}",
                parent.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(PdfDeckError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

fn write_file(path: &Path, bytes: &[u8], buffer_size: usize) -> Result<()> {
    let to_write_error = |source| PdfDeckError::FailedToWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::create(path).map_err(to_write_error)?;
    let mut writer = std::io::BufWriter::with_capacity(buffer_size, file);
    writer.write_all(bytes).map_err(to_write_error)?;
    writer.flush().map_err(to_write_error)?;
    Ok(())
}

/// `<name>.tmp` next to the target.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("export"));
    name.push(".tmp");
    path.with_file_name(name)
}
