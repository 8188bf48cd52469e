//! Command execution for the `pdfdeck` binary.
//!
//! Each command loads its inputs into a fresh [`DocumentSet`], runs one
//! operation and writes the result under the configured output directory.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::config::{Config, OverwriteMode};
use crate::error::{PdfDeckError, Result};
use crate::io::{ExportWriter, InputReader, LoadReport};
use crate::ops::ExportedDocument;
use crate::output::{
    OutputFormatter, display_documents, display_load_failures, display_read_statistics,
    display_write,
};
use crate::set::DocumentSet;
use crate::utils::collect_paths_for_patterns;
use crate::{NAME, VERSION, range};

/// Per-document entry of the `info --json` report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    /// Identity the file was loaded under.
    pub identity: String,
    /// Path the file was read from.
    pub path: PathBuf,
    /// Number of pages.
    pub page_count: u32,
    /// PDF header version.
    pub pdf_version: String,
    /// File size in bytes.
    pub size: u64,
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.is_verbose() {
        formatter.section(&format!("{NAME} v{VERSION}"));
        formatter.blank_line();
    }

    match cli.command {
        Command::Info { inputs, json } => info(&config, &formatter, &inputs, json).await,
        Command::Merge { inputs, output } => {
            merge(&config, &formatter, &inputs, output.as_deref()).await
        }
        Command::Split {
            input,
            pages,
            name,
        } => split(&config, &formatter, &input, &pages, name.as_deref()).await,
        Command::Extract { input, page } => extract(&config, &formatter, &input, page).await,
        Command::Archive { inputs, output } => {
            archive(&config, &formatter, &inputs, output.as_deref()).await
        }
        Command::Pages { expression, count } => {
            let canonical = range::normalize(&expression, count)?;
            println!("{canonical}");
            Ok(())
        }
        Command::Thumbnail {
            input,
            page,
            output,
        } => thumbnail(&config, &formatter, &input, page, output.as_deref()).await,
    }
}

async fn load_set(
    config: &Config,
    formatter: &OutputFormatter,
    patterns: &[String],
) -> Result<(DocumentSet, LoadReport)> {
    let paths = collect_paths_for_patterns(patterns)?;
    formatter.info(&format!("Loading {} document(s)...", paths.len()));

    let mut set = DocumentSet::with_config(config);
    let report = InputReader::new()
        .load_into(
            &mut set,
            &paths,
            config.effective_jobs(),
            config.continue_on_error,
        )
        .await?;

    display_load_failures(formatter, &report.failed);
    display_read_statistics(formatter, &report.stats);
    if formatter.is_verbose() {
        display_documents(formatter, set.records());
    }

    Ok((set, report))
}

async fn load_single(
    config: &Config,
    formatter: &OutputFormatter,
    pattern: &str,
) -> Result<(DocumentSet, String)> {
    let (set, report) = load_set(config, formatter, &[pattern.to_string()]).await?;

    let matched = report.loaded.len() + report.failed.len();
    match report.loaded.into_iter().next() {
        Some(input) if matched == 1 => Ok((set, input.identity)),
        _ => Err(PdfDeckError::invalid_config(format!(
            "'{pattern}' matches {matched} files; expected exactly one"
        ))),
    }
}

async fn info(
    config: &Config,
    formatter: &OutputFormatter,
    inputs: &[String],
    json: bool,
) -> Result<()> {
    let quiet_formatter = OutputFormatter::quiet();
    let (set, batch) = load_set(config, &quiet_formatter, inputs).await?;

    if json {
        let report: Vec<DocumentInfo> = batch
            .loaded
            .iter()
            .filter_map(|input| set.get(&input.identity).map(|record| (input, record)))
            .map(|(input, record)| DocumentInfo {
                identity: record.identity().to_string(),
                path: input.path.clone(),
                page_count: record.page_count(),
                pdf_version: record.pdf_version().to_string(),
                size: record.bytes().len() as u64,
            })
            .collect();

        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| PdfDeckError::other(format!("Failed to serialize report: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    display_documents(formatter, set.records());
    formatter.info(&format!(
        "{} document(s), {} page(s) in total",
        set.len(),
        set.total_pages()
    ));
    Ok(())
}

async fn merge(
    config: &Config,
    formatter: &OutputFormatter,
    inputs: &[String],
    output: Option<&str>,
) -> Result<()> {
    let (set, _) = load_set(config, formatter, inputs).await?;

    formatter.info("Merging documents...");
    let mut exported = set.merge().await?;
    if let Some(name) = output {
        exported.name = name.to_string();
    }

    formatter.info(&format!(
        "Merged {} document(s) into {} page(s)",
        set.len(),
        set.total_pages()
    ));
    write_export(config, formatter, &exported).await
}

async fn split(
    config: &Config,
    formatter: &OutputFormatter,
    input: &str,
    pages: &str,
    name: Option<&str>,
) -> Result<()> {
    let (mut set, identity) = load_single(config, formatter, input).await?;
    if let Some(name) = name {
        set.rename(&identity, name)?;
    }

    let selected = range::normalize(pages, set.get(&identity).map_or(0, |r| r.page_count()))?;
    formatter.debug(&format!("Selected pages: {selected}"));

    let exported = set.split(&identity, pages).await?;
    write_export(config, formatter, &exported).await
}

async fn extract(
    config: &Config,
    formatter: &OutputFormatter,
    input: &str,
    page: u32,
) -> Result<()> {
    let (set, identity) = load_single(config, formatter, input).await?;
    let exported = set.export_page(&identity, page).await?;
    write_export(config, formatter, &exported).await
}

async fn archive(
    config: &Config,
    formatter: &OutputFormatter,
    inputs: &[String],
    output: Option<&str>,
) -> Result<()> {
    let (set, _) = load_set(config, formatter, inputs).await?;

    let mut exported = set.export_archive()?;
    if let Some(name) = output {
        exported.name = name.to_string();
    }
    write_export(config, formatter, &exported).await
}

async fn thumbnail(
    config: &Config,
    formatter: &OutputFormatter,
    input: &str,
    page: u32,
    output: Option<&str>,
) -> Result<()> {
    let (set, identity) = load_single(config, formatter, input).await?;

    let png = set.thumbnail(&identity, page).await?;
    let name = match output {
        Some(name) => name.to_string(),
        None => {
            let base = set.get(&identity).map_or("page", |r| r.base_name());
            format!("{base}-page-{page}.png")
        }
    };

    write_export(config, formatter, &ExportedDocument::new(name, png.to_vec())).await
}

async fn write_export(
    config: &Config,
    formatter: &OutputFormatter,
    exported: &ExportedDocument,
) -> Result<()> {
    let path = config.output_path(&exported.name);
    handle_output_overwrite(config, formatter, &path)?;

    let stats = ExportWriter::overwriting()
        .save(&exported.bytes, &path)
        .await?;
    display_write(formatter, &stats);
    Ok(())
}

/// Decide whether an existing output file may be replaced.
fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
    path: &Path,
) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfDeckError::output_exists(path.to_path_buf())),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet mode
            if formatter.is_quiet() {
                return Err(PdfDeckError::output_exists(path.to_path_buf()));
            }

            formatter.warning(&format!("Output file already exists: {}", path.display()));
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| PdfDeckError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfDeckError::Cancelled)
            }
        }
    }
}
