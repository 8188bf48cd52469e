//! Integration tests for the command-line front end.

use clap::Parser;
use pdfdeck::PdfDeckError;
use pdfdeck::cli::Cli;
use pdfdeck::commands::run;

use crate::common::{Workspace, page_widths};

async fn pdfdeck(workspace: &Workspace, args: &[&str]) -> pdfdeck::Result<()> {
    let out_dir = workspace.out_dir_arg();
    let mut argv = vec!["pdfdeck"];
    argv.extend_from_slice(args);
    argv.extend_from_slice(&["--quiet", "--jobs", "2", "--output-dir", out_dir.as_str()]);

    run(Cli::try_parse_from(argv).unwrap()).await
}

#[tokio::test]
async fn test_merge_command() {
    let ws = Workspace::new();
    let b = ws.input("b.pdf", &[201, 202]);
    let a = ws.input("a.pdf", &[101]);

    pdfdeck(&ws, &["merge", &b, &a, "-o", "book.pdf"]).await.unwrap();

    let bytes = std::fs::read(ws.output("book.pdf")).unwrap();
    assert_eq!(page_widths(&bytes), vec![201, 202, 101]);
}

#[tokio::test]
async fn test_merge_command_with_glob() {
    let ws = Workspace::new();
    ws.input("2.pdf", &[2]);
    ws.input("1.pdf", &[1]);
    let pattern = ws.input_glob("*.pdf");

    pdfdeck(&ws, &["merge", &pattern]).await.unwrap();

    let bytes = std::fs::read(ws.output("merged.pdf")).unwrap();
    assert_eq!(page_widths(&bytes), vec![1, 2]);
}

#[tokio::test]
async fn test_split_command() {
    let ws = Workspace::new();
    let input = ws.input("report.pdf", &[1, 2, 3, 4, 5]);

    pdfdeck(&ws, &["split", &input, "--pages", "4-5, 1"]).await.unwrap();

    let bytes = std::fs::read(ws.output("report-[4-5,1].pdf")).unwrap();
    assert_eq!(page_widths(&bytes), vec![1, 4, 5]);
}

#[tokio::test]
async fn test_split_output_feeds_back_into_merge() {
    let ws = Workspace::new();
    let input = ws.input("report.pdf", &[1, 2, 3]);

    pdfdeck(&ws, &["split", &input, "--pages", "1-2"]).await.unwrap();

    let split = ws.output("report-[1-2].pdf");
    let split_arg = split.to_string_lossy().into_owned();
    pdfdeck(&ws, &["merge", &split_arg, &input, "-o", "again.pdf"])
        .await
        .unwrap();

    let bytes = std::fs::read(ws.output("again.pdf")).unwrap();
    assert_eq!(page_widths(&bytes), vec![1, 2, 1, 2, 3]);
}

#[tokio::test]
async fn test_split_command_with_display_name() {
    let ws = Workspace::new();
    let input = ws.input("scan_0001.pdf", &[1, 2]);

    pdfdeck(&ws, &["split", &input, "-p", "2", "--name", "Invoice.pdf"])
        .await
        .unwrap();

    assert!(ws.output("Invoice-[2].pdf").exists());
}

#[tokio::test]
async fn test_extract_command() {
    let ws = Workspace::new();
    let input = ws.input("a.pdf", &[1, 2, 3]);

    pdfdeck(&ws, &["extract", &input, "--page", "2"]).await.unwrap();

    let bytes = std::fs::read(ws.output("a-page-2.pdf")).unwrap();
    assert_eq!(page_widths(&bytes), vec![2]);
}

#[tokio::test]
async fn test_archive_command() {
    let ws = Workspace::new();
    let a = ws.input("a.pdf", &[1]);
    let b = ws.input("b.pdf", &[2]);

    pdfdeck(&ws, &["archive", &a, &b]).await.unwrap();

    let file = std::fs::File::open(ws.output("pdf_files.zip")).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"a.pdf") && names.contains(&"b.pdf"));
}

#[tokio::test]
async fn test_thumbnail_command() {
    let ws = Workspace::new();
    let input = ws.input("a.pdf", &[200, 400]);

    pdfdeck(&ws, &["thumbnail", &input, "--page", "2", "--scale", "0.25"])
        .await
        .unwrap();

    let png = std::fs::read(ws.output("a-page-2.png")).unwrap();
    let image = image::load_from_memory(&png).unwrap();
    assert_eq!((image.width(), image.height()), (100, 198));
}

#[tokio::test]
async fn test_info_and_pages_commands() {
    let ws = Workspace::new();
    let input = ws.input("a.pdf", &[1, 2]);

    pdfdeck(&ws, &["info", &input, "--json"]).await.unwrap();
    pdfdeck(&ws, &["pages", "3,1-2", "--count", "5"]).await.unwrap();

    let err = pdfdeck(&ws, &["pages", "1-9", "--count", "5"]).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::InvalidRange { .. }));
}

#[tokio::test]
async fn test_existing_output_is_not_overwritten_in_quiet_mode() {
    let ws = Workspace::new();
    let input = ws.input("a.pdf", &[1, 2]);
    std::fs::write(ws.output("a-page-1.pdf"), b"keep").unwrap();

    let err = pdfdeck(&ws, &["extract", &input, "--page", "1"]).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::OutputExists { .. }));
    assert_eq!(err.exit_code(), 4);
    assert_eq!(std::fs::read(ws.output("a-page-1.pdf")).unwrap(), b"keep");

    pdfdeck(&ws, &["extract", &input, "--page", "1", "--force"])
        .await
        .unwrap();
    assert_eq!(page_widths(&std::fs::read(ws.output("a-page-1.pdf")).unwrap()), vec![1]);
}

#[tokio::test]
async fn test_merge_with_corrupt_input() {
    let ws = Workspace::new();
    let a = ws.input("a.pdf", &[1]);
    let broken = ws.input_glob("broken.pdf");
    std::fs::write(&broken, b"%PDF-1.4 truncated").unwrap();
    let c = ws.input("c.pdf", &[3, 4]);

    let err = pdfdeck(&ws, &["merge", &a, &broken, &c]).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::EngineLoad { .. }));
    assert!(!ws.output("merged.pdf").exists());

    pdfdeck(&ws, &["merge", &a, &broken, &c, "--continue-on-error"])
        .await
        .unwrap();
    let bytes = std::fs::read(ws.output("merged.pdf")).unwrap();
    assert_eq!(page_widths(&bytes), vec![1, 3, 4]);
}

#[tokio::test]
async fn test_missing_input() {
    let ws = Workspace::new();
    let missing = ws.input_glob("missing.pdf");

    let err = pdfdeck(&ws, &["merge", &missing]).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::FailedToReadInput { .. }));
}
