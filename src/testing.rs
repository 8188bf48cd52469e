//! Test helpers: small PDFs built with lopdf.
//!
//! Each page gets its own MediaBox width so tests can tell pages apart after
//! they have been split, merged or reordered.

use async_trait::async_trait;
use lopdf::{Document, Object, Stream, dictionary};

use crate::engine::{
    DecodedDocument, DocumentEngine, EngineError, EngineResult, LopdfEngine, PageSource,
};

/// Build a PDF with one page per entry in `widths`, each page `width x 792`.
pub(crate) fn pdf_with_widths(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for &width in widths {
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(792),
            ],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => widths.len() as i64,
        }
        .into(),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    save(doc)
}

/// Build a PDF whose pages sit under an intermediate Pages node that carries
/// the MediaBox, so every page inherits `width x 792`.
pub(crate) fn nested_tree_pdf(pages: usize, width: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let root_id = doc.new_object_id();
    let branch_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for _ in 0..pages {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => branch_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        branch_id,
        dictionary! {
            "Type" => "Pages",
            "Parent" => root_id,
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(792),
            ],
        }
        .into(),
    );
    doc.objects.insert(
        root_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(branch_id)],
            "Count" => pages as i64,
        }
        .into(),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => root_id,
    });
    doc.trailer.set("Root", catalog_id);

    save(doc)
}

/// MediaBox widths of every page, in page order.
pub(crate) fn page_widths(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let mediabox = page.get(b"MediaBox").unwrap().as_array().unwrap();
            mediabox[2].as_i64().unwrap()
        })
        .collect()
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Engine that decodes and renders like [`LopdfEngine`] but fails every
/// composition, blaming `failing_input` when set.
#[derive(Debug, Default)]
pub(crate) struct FailingComposeEngine {
    pub(crate) inner: LopdfEngine,
    pub(crate) failing_input: Option<usize>,
}

#[async_trait]
impl DocumentEngine for FailingComposeEngine {
    async fn decode(&self, bytes: &[u8]) -> EngineResult<DecodedDocument> {
        self.inner.decode(bytes).await
    }

    async fn render_page(&self, bytes: &[u8], page: u32, scale: f32) -> EngineResult<Vec<u8>> {
        self.inner.render_page(bytes, page, scale).await
    }

    async fn compose(&self, _sources: &[PageSource<'_>]) -> EngineResult<Vec<u8>> {
        Err(EngineError::Compose {
            input: self.failing_input,
            reason: "simulated failure".to_string(),
        })
    }
}
