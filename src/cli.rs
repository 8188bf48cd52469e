//! CLI argument parsing for pdfdeck.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and conversion into a
//! [`Config`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let config = cli.to_config().expect("Invalid configuration");
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, DEFAULT_THUMBNAIL_SCALE, OverwriteMode};
use crate::error::{PdfDeckError, Result};

/// Load, reorder, split, merge and export sets of PDF documents.
#[derive(Parser, Debug)]
#[command(name = "pdfdeck")]
#[command(version)]
#[command(about = "Split, merge and export PDF documents", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Verbose output - show per-file details and timings
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    /// Useful for scripts and automation.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Number of files read or pages rendered in parallel
    ///
    /// Default is number of CPU cores. Use 1 for sequential processing.
    #[arg(short, long, value_name = "N", global = true, env = "PDFDECK_JOBS")]
    pub jobs: Option<usize>,

    /// Scale factor for page previews (1.0 = one pixel per point)
    #[arg(
        long,
        value_name = "FACTOR",
        global = true,
        env = "PDFDECK_SCALE",
        default_value_t = DEFAULT_THUMBNAIL_SCALE
    )]
    pub scale: f32,

    /// Directory exports are written to
    #[arg(
        short = 'd',
        long,
        value_name = "DIR",
        global = true,
        env = "PDFDECK_OUTPUT_DIR",
        default_value = "."
    )]
    pub output_dir: PathBuf,

    /// Force overwrite of existing output files without confirmation
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Never overwrite existing output files
    ///
    /// If an output file already exists, exit with an error
    /// instead of prompting or overwriting.
    #[arg(long, global = true, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Write composed documents without stream compression
    #[arg(long, global = true)]
    pub no_compress: bool,

    /// Continue processing even if some inputs fail to load
    ///
    /// By default, pdfdeck stops on the first error.
    /// With this flag, problematic files are skipped with a warning
    /// and processing continues with remaining files.
    #[arg(long, global = true)]
    pub continue_on_error: bool,
}

/// pdfdeck commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show page count, PDF version and size of each input
    Info {
        /// Input PDF files (glob patterns allowed)
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Print a JSON report instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Merge inputs into one document, in the order given
    ///
    /// Examples:
    ///   pdfdeck merge intro.pdf chapter*.pdf -o book.pdf
    Merge {
        /// Input PDF files (glob patterns allowed)
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Output file name (default: merged.pdf)
        #[arg(short, long, value_name = "NAME")]
        output: Option<String>,
    },

    /// Write a new document holding only the selected pages
    ///
    /// Examples:
    ///   pdfdeck split report.pdf --pages "1-3,7"
    Split {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: String,

        /// Page range expression, e.g. "1-3,5,8-10"
        #[arg(short, long, value_name = "RANGE")]
        pages: String,

        /// Display name used to derive the output name
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
    },

    /// Write a single page as its own document
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: String,

        /// Page number (1-based)
        #[arg(short, long, value_name = "N")]
        page: u32,
    },

    /// Pack inputs into a ZIP archive
    Archive {
        /// Input PDF files (glob patterns allowed)
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Output file name (default: pdf_files.zip)
        #[arg(short, long, value_name = "NAME")]
        output: Option<String>,
    },

    /// Print the canonical form of a page range expression
    Pages {
        /// Page range expression
        #[arg(value_name = "RANGE")]
        expression: String,

        /// Page count to validate against
        #[arg(short, long, value_name = "N")]
        count: u32,
    },

    /// Render a page preview as PNG
    Thumbnail {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: String,

        /// Page number (1-based)
        #[arg(short, long, value_name = "N", default_value_t = 1)]
        page: u32,

        /// Output file name (default: <name>-page-<N>.png)
        #[arg(short, long, value_name = "NAME")]
        output: Option<String>,
    },
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::InvalidConfig`] if validation fails.
    pub fn to_config(&self) -> Result<Config> {
        let global = &self.global;

        let overwrite_mode = if global.force {
            OverwriteMode::Force
        } else if global.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            thumbnail_scale: global.scale,
            jobs: global.jobs,
            compress: !global.no_compress,
            output_dir: global.output_dir.clone(),
            overwrite_mode,
            continue_on_error: global.continue_on_error,
            verbose: global.verbose,
            quiet: global.quiet,
        };

        config.validate().map_err(|e| {
            PdfDeckError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate arguments that clap cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Split { pages, .. } if pages.trim().is_empty() => {
                Err(PdfDeckError::EmptyExpression)
            }
            Command::Extract { page: 0, .. } | Command::Thumbnail { page: 0, .. } => Err(
                PdfDeckError::invalid_config("Page numbers start at 1"),
            ),
            Command::Pages { count: 0, .. } => Err(PdfDeckError::invalid_config(
                "Page count must be at least 1",
            )),
            _ => Ok(()),
        }
    }

    /// Default `tracing` filter for the chosen verbosity.
    pub fn default_log_filter(&self) -> &'static str {
        if self.global.verbose {
            "pdfdeck=debug"
        } else if self.global.quiet {
            "pdfdeck=error"
        } else {
            "pdfdeck=warn"
        }
    }
}
