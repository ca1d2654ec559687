mod common;

use common::*;
use pdf_compose::*;

#[tokio::test]
async fn test_load_source_by_kind() {
    let dir = tempfile::tempdir().unwrap();

    let pdf_path = dir.path().join("letter.pdf");
    let mut pdf = create_letter_pdf(2);
    pdf.save(&pdf_path).unwrap();

    let png_path = dir.path().join("photo.png");
    tokio::fs::write(&png_path, png_bytes(5, 5)).await.unwrap();

    let txt_path = dir.path().join("notes.txt");
    tokio::fs::write(&txt_path, "hello").await.unwrap();

    let pdf_source = load_source(&pdf_path).await.unwrap();
    assert_eq!(pdf_source.id().as_str(), "letter.pdf");
    assert_eq!(pdf_source.page_count(), 2);
    assert!(matches!(pdf_source.content(), SourceContent::Pages(_)));

    let png_source = load_source(&png_path).await.unwrap();
    assert!(matches!(png_source.content(), SourceContent::Raster { .. }));

    let txt_source = load_source(&txt_path).await.unwrap();
    assert!(matches!(txt_source.content(), SourceContent::Unsupported { .. }));
}

#[tokio::test]
async fn test_load_missing_file() {
    let result = load_source("/definitely/not/here.pdf").await;
    assert!(matches!(result, Err(ComposeError::Io(_))));
}

#[tokio::test]
async fn test_save_and_reload_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");

    let doc = source("four.pdf", create_letter_pdf(4));
    let adjustments = AdjustmentSpec {
        layout: layout::LayoutGrid::new(2, 1).unwrap(),
        ..AdjustmentSpec::default()
    };
    let output = preview_document(&doc, &adjustments, PaperFormat::A4).unwrap();
    let expected = output.to_bytes().unwrap();

    save_pdf(output, &path).await.unwrap();

    assert_eq!(tokio::fs::read(&path).await.unwrap(), expected);
    let reloaded = load_pdf(&path).await.unwrap();
    assert_eq!(reloaded.get_pages().len(), 2);
}
