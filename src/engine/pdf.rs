//! Document engine backed by `lopdf`.
//!
//! Composition follows the classic lopdf merge: each source is parsed,
//! its object ids are shifted past everything already in the output, its
//! objects are moved over wholesale, and the selected page objects are hung
//! off a fresh, flat page tree. Objects nothing points at any more are
//! pruned before the result is serialized.

use std::io::Cursor;

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use lopdf::{Document, Object, ObjectId, dictionary};

use super::{DecodedDocument, DocumentEngine, EngineError, EngineResult, PageSource};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Bound on page-tree depth when walking `Parent` links; guards against
/// cyclic trees in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// US Letter, used when a page carries no usable MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Largest edge of a rendered preview, in pixels.
const MAX_PREVIEW_EDGE: u32 = 4096;

const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const OUTLINE: Rgb<u8> = Rgb([160, 160, 160]);

/// [`DocumentEngine`] implementation on top of `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct LopdfEngine {
    /// Compress streams of composed documents before serializing.
    compress: bool,
}

impl LopdfEngine {
    /// Create an engine that compresses composed output.
    pub fn new() -> Self {
        Self { compress: true }
    }

    /// Create an engine that writes composed output uncompressed.
    pub fn without_compression() -> Self {
        Self { compress: false }
    }

    fn load(bytes: &[u8]) -> EngineResult<Document> {
        let doc = Document::load_mem(bytes).map_err(|e| EngineError::decode(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(EngineError::decode(
                "document is encrypted; decrypt it first (e.g. 'qpdf --decrypt')",
            ));
        }

        Ok(doc)
    }

    fn compose_sync(&self, sources: &[PageSource<'_>]) -> EngineResult<Vec<u8>> {
        if sources.iter().all(|source| source.pages.is_empty()) {
            return Err(EngineError::compose("no pages to compose"));
        }

        let mut output = Document::with_version("1.5");
        let pages_id = output.new_object_id();
        let mut kids: Vec<Object> = Vec::new();

        for (index, source) in sources.iter().enumerate() {
            let mut doc = Self::load(source.bytes)
                .map_err(|e| EngineError::compose_input(index, e.to_string()))?;

            if doc.version > output.version {
                output.version = doc.version.clone();
            }

            // Shift ids past everything already in the output
            doc.renumber_objects_with(output.max_id + 1);
            output.max_id = doc.max_id;

            let page_map = doc.get_pages();
            let mut selected = Vec::with_capacity(source.pages.len());
            for &page in source.pages {
                let page_id = page_map.get(&page).copied().ok_or_else(|| {
                    EngineError::compose_input(
                        index,
                        format!("page {page} does not exist ({} pages)", page_map.len()),
                    )
                })?;
                inherit_attributes(&mut doc, page_id);
                selected.push(page_id);
            }

            output.objects.extend(doc.objects);

            for page_id in selected {
                let page = output
                    .get_dictionary_mut(page_id)
                    .map_err(|e| EngineError::compose_input(index, e.to_string()))?;
                page.set("Parent", Object::Reference(pages_id));
                kids.push(Object::Reference(page_id));
            }
        }

        let count = kids.len() as i64;
        output.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }
            .into(),
        );

        let catalog_id = output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        output.trailer.set("Root", catalog_id);

        // Old catalogs and page trees are unreachable now
        output.prune_objects();
        output.renumber_objects();
        if self.compress {
            output.compress();
        }

        let mut buffer = Vec::new();
        output
            .save_to(&mut buffer)
            .map_err(|e| EngineError::compose(format!("failed to serialize: {e}")))?;

        Ok(buffer)
    }
}

#[async_trait]
impl DocumentEngine for LopdfEngine {
    async fn decode(&self, bytes: &[u8]) -> EngineResult<DecodedDocument> {
        let bytes = bytes.to_vec();

        // Parsing is CPU-bound; keep it off the async workers
        tokio::task::spawn_blocking(move || decode_document(&bytes))
            .await
            .map_err(|e| EngineError::decode(format!("Task join error: {e}")))?
    }

    async fn render_page(&self, bytes: &[u8], page: u32, scale: f32) -> EngineResult<Vec<u8>> {
        let bytes = bytes.to_vec();

        tokio::task::spawn_blocking(move || render_preview(&bytes, page, scale))
            .await
            .map_err(|e| EngineError::Render {
                page,
                reason: format!("Task join error: {e}"),
            })?
    }

    async fn compose(&self, sources: &[PageSource<'_>]) -> EngineResult<Vec<u8>> {
        let engine = self.clone();
        let owned: Vec<(Vec<u8>, Vec<u32>)> = sources
            .iter()
            .map(|source| (source.bytes.to_vec(), source.pages.to_vec()))
            .collect();

        tokio::task::spawn_blocking(move || {
            let sources: Vec<PageSource<'_>> = owned
                .iter()
                .map(|(bytes, pages)| PageSource {
                    bytes: bytes.as_slice(),
                    pages: pages.as_slice(),
                })
                .collect();
            engine.compose_sync(&sources)
        })
        .await
        .map_err(|e| EngineError::compose(format!("Task join error: {e}")))?
    }
}

fn decode_document(bytes: &[u8]) -> EngineResult<DecodedDocument> {
    let doc = LopdfEngine::load(bytes)?;

    let page_count = doc.get_pages().len();
    if page_count == 0 {
        return Err(EngineError::decode("document has no pages"));
    }

    Ok(DecodedDocument {
        page_count: page_count as u32,
        version: doc.version.clone(),
    })
}

fn render_preview(bytes: &[u8], page: u32, scale: f32) -> EngineResult<Vec<u8>> {
    let render_error = |reason: String| EngineError::Render { page, reason };

    if !scale.is_finite() || scale <= 0.0 {
        return Err(render_error(format!("invalid scale {scale}")));
    }

    let doc = LopdfEngine::load(bytes).map_err(|e| render_error(e.to_string()))?;
    let page_id = doc
        .get_pages()
        .get(&page)
        .copied()
        .ok_or_else(|| render_error("page does not exist".to_string()))?;

    let (width, height) = page_size(&doc, page_id);
    let width = ((width * scale).round() as u32).clamp(1, MAX_PREVIEW_EDGE);
    let height = ((height * scale).round() as u32).clamp(1, MAX_PREVIEW_EDGE);

    let mut preview = RgbImage::from_pixel(width, height, PAPER);
    for x in 0..width {
        preview.put_pixel(x, 0, OUTLINE);
        preview.put_pixel(x, height - 1, OUTLINE);
    }
    for y in 0..height {
        preview.put_pixel(0, y, OUTLINE);
        preview.put_pixel(width - 1, y, OUTLINE);
    }

    let mut png = Vec::new();
    preview
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| render_error(e.to_string()))?;

    Ok(png)
}

/// Look up a page attribute, following `Parent` links for inherited ones.
fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node_id = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(node_id).ok()?;
        if let Ok(value) = node.get(key) {
            return doc.dereference(value).ok().map(|(_, object)| object);
        }
        node_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

/// Copy inheritable attributes from ancestors onto the page itself, so the
/// page keeps its look once it is re-parented under a new tree.
fn inherit_attributes(doc: &mut Document, page_id: ObjectId) {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return;
    };

    let inherited: Vec<(&[u8], Object)> = INHERITABLE_ATTRIBUTES
        .iter()
        .filter(|key| !page.has(key))
        .filter_map(|&key| {
            inherited_attribute(doc, page_id, key).map(|value| (key, value.clone()))
        })
        .collect();

    if inherited.is_empty() {
        return;
    }

    if let Ok(page) = doc.get_dictionary_mut(page_id) {
        for (key, value) in inherited {
            page.set(key, value);
        }
    }
}

/// Page size in points, after applying `/Rotate`.
fn page_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let (width, height) = inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|object| object.as_array().ok())
        .filter(|mediabox| mediabox.len() >= 4)
        .and_then(|mediabox| {
            let coords: Vec<f32> = mediabox
                .iter()
                .take(4)
                .map(|value| value.as_float().ok())
                .collect::<Option<_>>()?;
            Some(((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs()))
        })
        .filter(|(w, h)| *w > 0.0 && *h > 0.0)
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let rotation = inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|object| object.as_i64().ok())
        .unwrap_or(0);

    if rotation.rem_euclid(180) == 90 {
        (height, width)
    } else {
        (width, height)
    }
}
