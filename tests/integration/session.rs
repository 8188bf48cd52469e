//! Integration tests for building up and editing a document set.

use pdfdeck::{DocumentSet, PdfDeckError, SharedDocumentSet};
use rstest::rstest;

use crate::common::{numbered_pdf, page_widths};

async fn loaded(names: &[&str]) -> DocumentSet {
    let mut set = DocumentSet::new();
    for (i, name) in names.iter().enumerate() {
        set.load(numbered_pdf(100 * (i as i64 + 1), 2), *name)
            .await
            .unwrap();
    }
    set
}

#[tokio::test]
async fn test_typical_session() {
    let mut set = loaded(&["cover.pdf", "body.pdf", "appendix.pdf"]).await;

    set.move_to("appendix.pdf", 1).unwrap();
    set.rename("cover.pdf", "Front Matter.pdf").unwrap();
    set.set_page_selection("body.pdf", "2").unwrap();
    assert!(set.remove("cover.pdf"));

    assert_eq!(set.ordered_identities(), vec!["appendix.pdf", "body.pdf"]);
    assert_eq!(set.page_selection("body.pdf").unwrap(), "2");

    let merged = set.merge().await.unwrap();
    assert_eq!(page_widths(&merged.bytes), vec![300, 301, 200, 201]);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(usize::MAX)]
#[tokio::test]
async fn test_move_keeps_membership_and_relative_order(#[case] index: usize) {
    let names = ["a.pdf", "b.pdf", "c.pdf", "d.pdf"];
    let mut set = loaded(&names).await;

    let final_index = set.move_to("b.pdf", index).unwrap();
    let order = set.ordered_identities();

    assert_eq!(final_index, index.min(names.len() - 1));
    assert_eq!(order[final_index], "b.pdf");
    assert_eq!(order.len(), names.len());

    let rest: Vec<&str> = order
        .iter()
        .map(String::as_str)
        .filter(|name| *name != "b.pdf")
        .collect();
    assert_eq!(rest, vec!["a.pdf", "c.pdf", "d.pdf"]);
}

#[tokio::test]
async fn test_reload_after_remove() {
    let mut set = loaded(&["a.pdf"]).await;

    assert!(set.remove("a.pdf"));
    assert!(set.is_empty());

    set.load(numbered_pdf(500, 3), "a.pdf").await.unwrap();
    assert_eq!(set.get("a.pdf").unwrap().page_count(), 3);
}

#[tokio::test]
async fn test_duplicate_load_keeps_first() {
    let mut set = loaded(&["a.pdf"]).await;

    let err = set.load(numbered_pdf(900, 5), "a.pdf").await.unwrap_err();
    assert!(matches!(err, PdfDeckError::DuplicateIdentity { .. }));

    assert_eq!(set.len(), 1);
    assert_eq!(set.get("a.pdf").unwrap().page_count(), 2);
}

#[tokio::test]
async fn test_selection_highlighting() {
    let mut set = DocumentSet::new();
    set.load(numbered_pdf(1, 10), "a.pdf").await.unwrap();

    assert!(set.selected_pages("a.pdf").unwrap().is_empty());

    set.set_page_selection("a.pdf", "8-10, 1-3, 5").unwrap();
    let pages: Vec<u32> = set.selected_pages("a.pdf").unwrap().into_iter().collect();
    assert_eq!(pages, vec![1, 2, 3, 5, 8, 9, 10]);

    assert_eq!(set.toggle_page("a.pdf", 4).unwrap(), "1-5,8-10");
}

#[tokio::test]
async fn test_shared_set_across_tasks() {
    let shared = SharedDocumentSet::new(DocumentSet::new());

    {
        let mut set = shared.write().await;
        set.load(numbered_pdf(100, 3), "a.pdf").await.unwrap();
        set.load(numbered_pdf(200, 1), "b.pdf").await.unwrap();
    }

    let reader = shared.clone();
    let previews = async {
        let set = reader.read().await;
        set.thumbnails("a.pdf", &[1, 2, 3]).await
    };
    let merged = async {
        let set = shared.read().await;
        set.merge().await
    };

    let (previews, merged) = tokio::join!(previews, merged);
    assert_eq!(previews.unwrap().len(), 3);
    assert_eq!(page_widths(&merged.unwrap().bytes), vec![100, 101, 102, 200]);
}
