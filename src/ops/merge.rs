use tracing::{debug, info};

use crate::document::DocumentRecord;
use crate::engine::{DocumentEngine, EngineError, PageSource};
use crate::error::{PdfDeckError, Result};
use crate::ops::{ExportedDocument, MERGED_NAME};

/// Concatenate every page of every record, in the order given.
///
/// # Errors
///
/// - [`PdfDeckError::EmptyCollection`] when `records` is empty.
/// - [`PdfDeckError::EngineCompose`] when the engine fails; the identity is
///   filled in when the engine can tell which source was at fault.
pub async fn merge<E>(engine: &E, records: &[&DocumentRecord]) -> Result<ExportedDocument>
where
    E: DocumentEngine + ?Sized,
{
    if records.is_empty() {
        return Err(PdfDeckError::EmptyCollection);
    }

    let page_lists: Vec<Vec<u32>> = records
        .iter()
        .map(|record| (1..=record.page_count()).collect())
        .collect();

    let sources: Vec<PageSource<'_>> = records
        .iter()
        .zip(&page_lists)
        .map(|(record, pages)| PageSource {
            bytes: record.bytes(),
            pages,
        })
        .collect();

    let total_pages: usize = page_lists.iter().map(Vec::len).sum();
    debug!(documents = records.len(), total_pages, "Merging documents");

    let bytes = engine
        .compose(&sources)
        .await
        .map_err(|err| compose_error(records, err))?;

    info!(documents = records.len(), total_pages, "Merge complete");
    Ok(ExportedDocument::new(MERGED_NAME, bytes))
}

fn compose_error(records: &[&DocumentRecord], err: EngineError) -> PdfDeckError {
    let identity = match &err {
        EngineError::Compose { input: Some(index), .. } => records
            .get(*index)
            .map(|record| record.identity().to_string()),
        _ => None,
    };
    PdfDeckError::engine_compose(identity, err.to_string())
}
