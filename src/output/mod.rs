//! Output formatting and display for pdfdeck.
//!
//! This module handles all user-facing output of the command-line tool:
//! - Formatted status messages
//! - Document listings
//! - Read and write summaries
//! - Quiet and verbose modes

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::document::DocumentRecord;
use crate::io::{LoadFailure, ReadStatistics, WriteStatistics};
use crate::utils::format_file_size;

/// One-line description of a loaded document.
pub fn describe_document(record: &DocumentRecord) -> String {
    let mut line = format!(
        "{} ({} page{}, PDF {}, {})",
        record.display_name(),
        record.page_count(),
        if record.page_count() == 1 { "" } else { "s" },
        record.pdf_version(),
        format_file_size(record.bytes().len() as u64),
    );
    if record.display_name() != record.identity() {
        line.push_str(&format!(" [{}]", record.identity()));
    }
    line
}

/// List documents in collection order.
pub fn display_documents<'a>(
    formatter: &OutputFormatter,
    records: impl IntoIterator<Item = &'a DocumentRecord>,
) {
    for (index, record) in records.into_iter().enumerate() {
        formatter.list_item(index + 1, &describe_document(record));
    }
}

/// Warn about every input that was skipped.
pub fn display_load_failures(formatter: &OutputFormatter, failures: &[LoadFailure]) {
    for failure in failures {
        formatter.warning(&format!("Skipping {}: {}", failure.path.display(), failure.error));
    }
}

/// Display read statistics to the user.
pub fn display_read_statistics(formatter: &OutputFormatter, stats: &ReadStatistics) {
    formatter.debug(&format!(
        "Read {} file(s) in {:.2}s: {}",
        stats.file_count,
        stats.total_time.as_secs_f64(),
        stats.format_total_size()
    ));
    if stats.files_failed > 0 {
        formatter.warning(&format!("{} input(s) skipped", stats.files_failed));
    }
}

/// Report a finished write.
pub fn display_write(formatter: &OutputFormatter, stats: &WriteStatistics) {
    formatter.success(&format!(
        "Wrote {} ({})",
        stats.output_path.display(),
        stats.format_file_size()
    ));
    formatter.detail("Write time", &format!("{:.2?}", stats.write_time));
}
