//! Configuration module for pdfdeck.
//!
//! This module turns CLI arguments into a validated configuration that
//! drives a session. It handles:
//! - Validation of argument combinations
//! - Application of defaults
//! - Resolution of output paths

use std::path::{Path, PathBuf};

use crate::engine::LopdfEngine;
use crate::error::{PdfDeckError, Result};

/// Scale applied to page previews when nothing else is configured.
pub const DEFAULT_THUMBNAIL_SCALE: f32 = 0.5;

/// Largest accepted preview scale.
pub const MAX_THUMBNAIL_SCALE: f32 = 8.0;

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Settings for a pdfdeck session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scale factor for page previews.
    pub thumbnail_scale: f32,

    /// Number of parallel jobs for loading and rendering (None = auto-detect).
    pub jobs: Option<usize>,

    /// Compress streams of composed documents.
    pub compress: bool,

    /// Directory exports are written to.
    pub output_dir: PathBuf,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Skip inputs that fail to load instead of stopping.
    pub continue_on_error: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thumbnail_scale: DEFAULT_THUMBNAIL_SCALE,
            jobs: None,
            compress: true,
            output_dir: PathBuf::from("."),
            overwrite_mode: OverwriteMode::default(),
            continue_on_error: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::InvalidConfig`] if:
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The thumbnail scale is not a positive number up to
    ///   [`MAX_THUMBNAIL_SCALE`]
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(PdfDeckError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfDeckError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if !self.thumbnail_scale.is_finite()
            || self.thumbnail_scale <= 0.0
            || self.thumbnail_scale > MAX_THUMBNAIL_SCALE
        {
            return Err(PdfDeckError::invalid_config(format!(
                "Thumbnail scale must be greater than 0 and at most {MAX_THUMBNAIL_SCALE}, got {}",
                self.thumbnail_scale
            )));
        }

        Ok(())
    }

    /// Get the effective number of parallel jobs.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if status output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Engine configured for this session.
    pub fn engine(&self) -> LopdfEngine {
        if self.compress {
            LopdfEngine::new()
        } else {
            LopdfEngine::without_compression()
        }
    }

    /// Where an export called `name` is written. Absolute names are kept.
    pub fn output_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.output_dir.join(name)
    }
}
