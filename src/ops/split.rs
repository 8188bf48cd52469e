use tracing::{debug, info};

use crate::document::DocumentRecord;
use crate::engine::{DocumentEngine, EngineError, PageSource};
use crate::error::{PdfDeckError, Result};
use crate::ops::ExportedDocument;
use crate::range;

/// Build a new document holding the pages `expression` selects from
/// `record`.
///
/// Pages are written once each, in ascending order, however the expression
/// orders or repeats them. The result is named
/// `<base name>-[<expression without whitespace>].pdf`.
///
/// # Errors
///
/// Parse failures come back unchanged. Engine failures become
/// [`PdfDeckError::EngineCompose`] naming the record.
pub async fn split<E>(engine: &E, record: &DocumentRecord, expression: &str) -> Result<ExportedDocument>
where
    E: DocumentEngine + ?Sized,
{
    let ranges = range::parse(expression, record.page_count())?;
    let pages: Vec<u32> = range::expand(&ranges).into_iter().collect();

    debug!(
        identity = record.identity(),
        expression,
        pages = pages.len(),
        "Splitting document"
    );

    let source = PageSource {
        bytes: record.bytes(),
        pages: &pages,
    };
    let bytes = engine
        .compose(std::slice::from_ref(&source))
        .await
        .map_err(|err| compose_error(record, err))?;

    let name = split_name(record.base_name(), expression);
    info!(identity = record.identity(), name = %name, "Split complete");

    Ok(ExportedDocument::new(name, bytes))
}

/// Suggested file name for a split of `base_name` by `expression`.
pub fn split_name(base_name: &str, expression: &str) -> String {
    let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{base_name}-[{compact}].pdf")
}

fn compose_error(record: &DocumentRecord, err: EngineError) -> PdfDeckError {
    PdfDeckError::engine_compose(Some(record.identity().to_string()), err.to_string())
}
