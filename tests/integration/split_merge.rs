//! Integration tests for split, merge and export.

use std::io::{Cursor, Read};

use pdfdeck::{DocumentSet, LopdfEngine, PdfDeckError};
use rstest::rstest;

use crate::common::{numbered_pdf, page_widths, pdf_with_widths};

#[tokio::test]
async fn test_split_selects_pages() {
    let mut set = DocumentSet::new();
    set.load(pdf_with_widths(&[1, 2, 3, 4, 5]), "a.pdf")
        .await
        .unwrap();

    let exported = set.split("a.pdf", "3,1-2").await.unwrap();

    assert_eq!(exported.name, "a-[3,1-2].pdf");
    assert_eq!(page_widths(&exported.bytes), vec![1, 2, 3]);
}

#[rstest]
#[case("1", vec![10])]
#[case("5", vec![14])]
#[case("2-4", vec![11, 12, 13])]
#[case("5, 1", vec![10, 14])]
#[case("1-5", vec![10, 11, 12, 13, 14])]
#[case("4,4,4-5,,", vec![13, 14])]
#[tokio::test]
async fn test_split_expressions(#[case] expression: &str, #[case] expected: Vec<i64>) {
    let mut set = DocumentSet::new();
    set.load(numbered_pdf(10, 5), "doc.pdf").await.unwrap();

    let exported = set.split("doc.pdf", expression).await.unwrap();
    assert_eq!(page_widths(&exported.bytes), expected);
}

#[tokio::test]
async fn test_split_output_can_be_split_again() {
    let mut set = DocumentSet::new();
    set.load(numbered_pdf(10, 6), "a.pdf").await.unwrap();

    let first = set.split_into_set("a.pdf", "2-5").await.unwrap();
    let second = set.split(&first, "2-3").await.unwrap();

    assert_eq!(second.name, "a-[2-5]-[2-3].pdf");
    assert_eq!(page_widths(&second.bytes), vec![12, 13]);
}

#[tokio::test]
async fn test_merge_two_and_three_pages() {
    let mut set = DocumentSet::new();
    set.load(numbered_pdf(100, 2), "first.pdf").await.unwrap();
    set.load(numbered_pdf(200, 3), "second.pdf").await.unwrap();

    let merged = set.merge().await.unwrap();

    assert_eq!(merged.name, "merged.pdf");
    assert_eq!(page_widths(&merged.bytes), vec![100, 101, 200, 201, 202]);
}

#[tokio::test]
async fn test_merged_output_loads_back() {
    let mut set = DocumentSet::new();
    set.load(numbered_pdf(100, 2), "a.pdf").await.unwrap();
    set.load(numbered_pdf(200, 2), "b.pdf").await.unwrap();

    let merged = set.merge().await.unwrap();
    set.load(merged.bytes, merged.name).await.unwrap();

    assert_eq!(set.get("merged.pdf").unwrap().page_count(), 4);
}

#[tokio::test]
async fn test_uncompressed_engine_output() {
    let mut set = DocumentSet::with_engine(LopdfEngine::without_compression());
    set.load(numbered_pdf(100, 3), "a.pdf").await.unwrap();

    let exported = set.split("a.pdf", "2").await.unwrap();
    assert_eq!(page_widths(&exported.bytes), vec![101]);
}

#[tokio::test]
async fn test_export_page_and_archive() {
    let mut set = DocumentSet::new();
    set.load(numbered_pdf(100, 3), "a.pdf").await.unwrap();
    set.load(numbered_pdf(200, 1), "b.pdf").await.unwrap();
    set.rename("b.pdf", "a.pdf").unwrap();

    let page = set.export_page("a.pdf", 3).await.unwrap();
    assert_eq!(page.name, "a-page-3.pdf");
    assert_eq!(page_widths(&page.bytes), vec![102]);

    let archive = set.export_archive().unwrap();
    assert_eq!(archive.name, "pdf_files.zip");

    let mut zip = zip::ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
    let mut names = Vec::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        assert!(!page_widths(&bytes).is_empty());
        names.push(entry.name().to_string());
    }
    assert_eq!(names, vec!["a.pdf", "a (2).pdf"]);
}

#[tokio::test]
async fn test_merge_empty_set() {
    let set = DocumentSet::new();
    assert!(matches!(set.merge().await, Err(PdfDeckError::EmptyCollection)));
}
