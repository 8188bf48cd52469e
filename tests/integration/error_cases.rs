//! Integration tests for error handling.

use pdfdeck::{DocumentSet, PdfDeckError};
use rstest::rstest;

use crate::common::numbered_pdf;

async fn five_pages() -> DocumentSet {
    let mut set = DocumentSet::new();
    set.load(numbered_pdf(1, 5), "a.pdf").await.unwrap();
    set
}

#[rstest]
#[case("0-3", "0-3")]
#[case("1-6", "1-6")]
#[case("6", "6")]
#[case("3-1", "3-1")]
#[case("1,x", "x")]
#[case(" 1 - 2 - 3 ", "1 - 2 - 3")]
#[case("-2", "-2")]
#[tokio::test]
async fn test_invalid_ranges(#[case] expression: &str, #[case] token: &str) {
    let set = five_pages().await;

    let err = set.split("a.pdf", expression).await.unwrap_err();
    assert!(
        matches!(&err, PdfDeckError::InvalidRange { token: t } if t == token),
        "unexpected error: {err:?}"
    );
    assert!(err.is_recoverable());
    assert_eq!(err.exit_code(), 1);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case(",,")]
#[tokio::test]
async fn test_empty_expressions(#[case] expression: &str) {
    let set = five_pages().await;
    assert!(matches!(
        set.split("a.pdf", expression).await,
        Err(PdfDeckError::EmptyExpression)
    ));
}

#[tokio::test]
async fn test_unknown_identity() {
    let mut set = five_pages().await;

    assert!(matches!(
        set.split("b.pdf", "1").await,
        Err(PdfDeckError::NotFound { .. })
    ));
    assert!(matches!(
        set.rename("b.pdf", "x"),
        Err(PdfDeckError::NotFound { .. })
    ));
    assert!(matches!(
        set.move_to("b.pdf", 0),
        Err(PdfDeckError::NotFound { .. })
    ));
    assert!(matches!(set.export("b.pdf"), Err(PdfDeckError::NotFound { .. })));
    assert!(!set.remove("b.pdf"));
}

#[tokio::test]
async fn test_failed_operations_leave_set_intact() {
    let mut set = five_pages().await;
    set.load(numbered_pdf(10, 2), "b.pdf").await.unwrap();
    set.rename("b.pdf", "Bee.pdf").unwrap();
    let before = set.ordered_identities();

    assert!(set.load(b"%PDF-1.4 broken".to_vec(), "c.pdf").await.is_err());
    assert!(set.load(numbered_pdf(1, 1), "a.pdf").await.is_err());
    assert!(set.split_into_set("a.pdf", "9").await.is_err());
    assert!(set.export_page("b.pdf", 3).await.is_err());

    assert_eq!(set.ordered_identities(), before);
    assert_eq!(set.get("a.pdf").unwrap().page_count(), 5);
    assert_eq!(set.get("b.pdf").unwrap().display_name(), "Bee.pdf");
}

#[tokio::test]
async fn test_engine_load_error_message() {
    let mut set = DocumentSet::new();
    let err = set.load(Vec::new(), "empty.pdf").await.unwrap_err();

    assert!(matches!(err, PdfDeckError::EngineLoad { .. }));
    assert!(err.to_string().contains("empty.pdf"));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_move_on_empty_set() {
    let mut set = DocumentSet::new();
    assert!(matches!(
        set.move_to("a.pdf", 3),
        Err(PdfDeckError::IndexOutOfRange { index: 3 })
    ));
}
