//! Shared helpers for integration tests.
//!
//! PDFs are generated on the fly with lopdf. Every page gets a distinct
//! MediaBox width so tests can tell pages apart after they are moved
//! between documents.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{Document, Object, Stream, dictionary};
use tempfile::TempDir;

/// Build a PDF with one `width x 792` page per entry in `widths`.
pub fn pdf_with_widths(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = widths
        .iter()
        .map(|&width| {
            let content_id = doc.add_object(Stream::new(dictionary! {}, b"q Q".to_vec()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(792),
                ],
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

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

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A PDF whose pages are numbered `first..first + count` via their widths.
pub fn numbered_pdf(first: i64, count: i64) -> Vec<u8> {
    let widths: Vec<i64> = (first..first + count).collect();
    pdf_with_widths(&widths)
}

/// MediaBox widths of every page, in page order.
pub fn page_widths(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            page.get(b"MediaBox").unwrap().as_array().unwrap()[2]
                .as_i64()
                .unwrap()
        })
        .collect()
}

/// Write a generated PDF into `dir` and return its path.
pub fn write_pdf(dir: &Path, name: &str, widths: &[i64]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_with_widths(widths)).unwrap();
    path
}

/// A temporary directory with an `in/` and an `out/` subdirectory.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("in")).unwrap();
        std::fs::create_dir(dir.path().join("out")).unwrap();
        Self { dir }
    }

    pub fn input(&self, name: &str, widths: &[i64]) -> String {
        write_pdf(&self.dir.path().join("in"), name, widths)
            .to_string_lossy()
            .into_owned()
    }

    pub fn input_glob(&self, pattern: &str) -> String {
        self.dir
            .path()
            .join("in")
            .join(pattern)
            .to_string_lossy()
            .into_owned()
    }

    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn out_dir_arg(&self) -> String {
        self.out_dir().to_string_lossy().into_owned()
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.out_dir().join(name)
    }
}
