//! Reading input files.
//!
//! Files are read into memory with `tokio::fs` and handed to the document
//! set as byte buffers. Reading many files runs with bounded parallelism
//! while keeping results in input order, since input order becomes
//! collection order.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::DocumentSet;
//! use pdfdeck::io::InputReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> pdfdeck::Result<()> {
//! let reader = InputReader::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//!
//! let mut set = DocumentSet::new();
//! let report = reader.load_into(&mut set, &paths, 4, true).await?;
//! println!("Loaded {}, skipped {}", report.loaded.len(), report.failed.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::engine::DocumentEngine;
use crate::error::{PdfDeckError, Result};
use crate::set::DocumentSet;
use crate::utils::{format_file_size, identity_for_path};

/// An input file read into memory.
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Path the file was read from.
    pub path: PathBuf,

    /// Identity the file will be loaded under.
    pub identity: String,

    /// File contents.
    pub bytes: Vec<u8>,

    /// Time taken to read the file.
    pub read_time: Duration,
}

impl InputFile {
    /// Size of the file in bytes.
    pub fn file_size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Statistics for a batch read.
#[derive(Debug, Clone, Default)]
pub struct ReadStatistics {
    /// Number of files read.
    pub file_count: usize,

    /// Total time taken for the batch.
    pub total_time: Duration,

    /// Total size of all files.
    pub total_size: u64,

    /// Number of files that could not be read or loaded.
    pub files_failed: usize,
}

impl ReadStatistics {
    fn from_files(files: &[InputFile], total_time: Duration) -> Self {
        Self {
            file_count: files.len(),
            total_time,
            total_size: files.iter().map(InputFile::file_size).sum(),
            files_failed: 0,
        }
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// A file that made it into the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedInput {
    /// Path the file was read from.
    pub path: PathBuf,
    /// Identity it was loaded under.
    pub identity: String,
}

/// A file skipped while loading with `continue_on_error`.
#[derive(Debug)]
pub struct LoadFailure {
    /// Path of the skipped file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub error: PdfDeckError,
}

/// Outcome of [`InputReader::load_into`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Files loaded, in collection order.
    pub loaded: Vec<LoadedInput>,
    /// Files skipped, in input order.
    pub failed: Vec<LoadFailure>,
    /// Read statistics for the batch.
    pub stats: ReadStatistics,
}

/// Reads input files from disk.
#[derive(Debug, Clone, Default)]
pub struct InputReader;

impl InputReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a single file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::FailedToReadInput`] if the file cannot be read.
    pub async fn read(&self, path: &Path) -> Result<InputFile> {
        let start = Instant::now();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PdfDeckError::FailedToReadInput {
                path: path.to_path_buf(),
                source,
            })?;

        let read_time = start.elapsed();
        debug!(path = %path.display(), size = bytes.len(), ?read_time, "Read input file");

        Ok(InputFile {
            path: path.to_path_buf(),
            identity: identity_for_path(path),
            bytes,
            read_time,
        })
    }

    /// Read several files with up to `workers` reads in flight.
    ///
    /// One result per path, in the same order as `paths`.
    pub async fn read_each(&self, paths: &[PathBuf], workers: usize) -> Vec<Result<InputFile>> {
        stream::iter(paths.iter().map(|path| self.read(path)))
            .buffered(workers.max(1))
            .collect()
            .await
    }

    /// Read several files, stopping at the first that cannot be read.
    ///
    /// Results come back in the same order as `paths`.
    pub async fn read_all(
        &self,
        paths: &[PathBuf],
        workers: usize,
    ) -> Result<(Vec<InputFile>, ReadStatistics)> {
        let start = Instant::now();

        let files = self
            .read_each(paths, workers)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        let stats = ReadStatistics::from_files(&files, start.elapsed());
        Ok((files, stats))
    }

    /// Read `paths` and load each file into `set`, in order.
    ///
    /// By default the first file that cannot be read or decoded aborts the
    /// batch; files loaded before it stay in the set. With
    /// `continue_on_error` such files are skipped and listed in
    /// [`LoadReport::failed`] instead.
    ///
    /// # Errors
    ///
    /// The first failure, unless `continue_on_error` is set. With
    /// `continue_on_error`, the first failure only if no file loaded at all.
    pub async fn load_into<E: DocumentEngine>(
        &self,
        set: &mut DocumentSet<E>,
        paths: &[PathBuf],
        workers: usize,
        continue_on_error: bool,
    ) -> Result<LoadReport> {
        let start = Instant::now();
        let results = self.read_each(paths, workers).await;

        let mut report = LoadReport::default();
        for (path, result) in paths.iter().zip(results) {
            let outcome = match result {
                Ok(file) => {
                    report.stats.file_count += 1;
                    report.stats.total_size += file.file_size();
                    set.load(file.bytes, file.identity)
                        .await
                        .map(|record| record.identity().to_string())
                }
                Err(error) => Err(error),
            };

            match outcome {
                Ok(identity) => report.loaded.push(LoadedInput {
                    path: path.clone(),
                    identity,
                }),
                Err(error) if continue_on_error => {
                    warn!(path = %path.display(), error = %error, "Skipping input");
                    report.failed.push(LoadFailure {
                        path: path.clone(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        if report.loaded.is_empty() && !report.failed.is_empty() {
            return Err(report.failed.remove(0).error);
        }

        report.stats.files_failed = report.failed.len();
        report.stats.total_time = start.elapsed();
        Ok(report)
    }
}
