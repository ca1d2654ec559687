mod common;

use common::*;
use pdf_compose::*;
use std::num::NonZeroUsize;

fn nup(columns: usize, rows: usize, fill_mode: FillMode) -> AdjustmentSpec {
    AdjustmentSpec {
        layout: layout::LayoutGrid::new(columns, rows).unwrap(),
        fill_mode,
        ..AdjustmentSpec::default()
    }
}

fn single_copy(outputs: Vec<OutputDocument>) -> OutputDocument {
    assert_eq!(outputs.len(), 1);
    outputs.into_iter().next().unwrap()
}

#[test]
fn test_passthrough_keeps_pages() {
    let doc = source("plain.pdf", create_test_pdf(&[(612, 792), (595, 842)]));
    let output = single_copy(
        compose_document(&doc, &AdjustmentSpec::default(), PaperFormat::A4).unwrap(),
    );

    assert_eq!(output.page_count(), 2);
    assert_eq!(
        page_sizes(output.document()),
        vec![(612.0, 792.0), (595.0, 842.0)]
    );
    assert_eq!(
        page_content(output.document(), 0),
        "q 1 0 0 1 0 0 cm /P0 Do Q\n"
    );
    assert_eq!(
        page_content(output.document(), 1),
        "q 1 0 0 1 0 0 cm /P1 Do Q\n"
    );
}

#[test]
fn test_page_size_independent_of_scale_and_rotation() {
    let doc = source("sized.pdf", create_test_pdf(&[(400, 700), (800, 300)]));

    for scale in [10.0, 55.5, 100.0, 150.0, 200.0] {
        for rotation in [0, 90, 180, 270] {
            let adjustments = AdjustmentSpec {
                scale: Scale::new(scale).unwrap(),
                rotation: Rotation::try_from(rotation).unwrap(),
                ..AdjustmentSpec::default()
            };
            let output = single_copy(compose_document(&doc, &adjustments, PaperFormat::A4).unwrap());
            assert_eq!(
                page_sizes(output.document()),
                vec![(400.0, 700.0), (800.0, 300.0)],
                "scale {scale}, rotation {rotation}"
            );
        }
    }
}

#[test]
fn test_quarter_turn_shrinks_to_fit() {
    let doc = source("portrait.pdf", create_letter_pdf(1));
    let adjustments = AdjustmentSpec {
        rotation: Rotation::Clockwise90,
        ..AdjustmentSpec::default()
    };
    let output = single_copy(compose_document(&doc, &adjustments, PaperFormat::A4).unwrap());

    // 792 wide once turned; it must fit 612
    let content = page_content(output.document(), 0);
    let scale = 612.0_f32 / 792.0;
    assert!(content.starts_with(&format!("q 0 -{scale} {scale} 0 ")), "{content}");
}

#[test]
fn test_page_range_selects_pages() {
    let doc = source("ten.pdf", create_letter_pdf(10));
    let adjustments = AdjustmentSpec {
        page_range: PageRange::Specific("1,3,5-7, 42, x".into()),
        ..AdjustmentSpec::default()
    };
    let output = single_copy(compose_document(&doc, &adjustments, PaperFormat::A4).unwrap());

    assert_eq!(output.page_count(), 5);
    assert!(page_content(output.document(), 1).contains("/P2 Do"));
    assert!(page_content(output.document(), 4).contains("/P6 Do"));
}

#[test]
fn test_empty_selection_gives_empty_output() {
    let doc = source("ten.pdf", create_letter_pdf(10));
    let adjustments = AdjustmentSpec {
        page_range: PageRange::Specific("0,11".into()),
        ..AdjustmentSpec::default()
    };
    let output = single_copy(compose_document(&doc, &adjustments, PaperFormat::A4).unwrap());
    assert_eq!(output.page_count(), 0);
    assert!(output.to_bytes().is_ok());
}

#[test]
fn test_sequential_nup_sheet_count() {
    let doc = source("ten.pdf", create_test_pdf(&vec![(600, 800); 10]));
    let output = single_copy(
        compose_document(&doc, &nup(2, 2, FillMode::Sequential), PaperFormat::A4).unwrap(),
    );

    assert_eq!(output.page_count(), 3);
    assert_eq!(page_sizes(output.document()), vec![(600.0, 800.0); 3]);

    // Last sheet: pages 9 and 10 in cells 0 and 1, cells 2 and 3 blank
    let last = page_content(output.document(), 2);
    assert_eq!(last.matches(" Do Q").count(), 2);
    assert!(last.contains("/P8 Do") && last.contains("/P9 Do"));
}

#[test]
fn test_nup_sheet_takes_first_selected_page_size() {
    let doc = source(
        "mixed.pdf",
        create_test_pdf(&[(300, 300), (500, 400), (600, 800)]),
    );
    let adjustments = AdjustmentSpec {
        page_range: PageRange::Specific("2-3".into()),
        ..nup(2, 1, FillMode::Sequential)
    };
    let output = single_copy(compose_document(&doc, &adjustments, PaperFormat::A4).unwrap());
    assert_eq!(page_sizes(output.document()), vec![(500.0, 400.0)]);
}

#[test]
fn test_replicate_one_sheet_per_page() {
    let doc = source("three.pdf", create_letter_pdf(3));
    let output = single_copy(
        compose_document(&doc, &nup(3, 2, FillMode::Replicate), PaperFormat::A4).unwrap(),
    );

    assert_eq!(output.page_count(), 3);
    for sheet in 0..3 {
        let content = page_content(output.document(), sheet);
        assert_eq!(content.matches(&format!("/P{sheet} Do")).count(), 6);
    }
}

#[test]
fn test_disabled_cell_left_blank() {
    let doc = source("eight.pdf", create_letter_pdf(8));
    let adjustments = AdjustmentSpec {
        enabled_cells: vec![true, true, false, true],
        ..nup(2, 2, FillMode::Sequential)
    };
    let output = single_copy(compose_document(&doc, &adjustments, PaperFormat::A4).unwrap());

    assert_eq!(output.page_count(), 2);
    let first = page_content(output.document(), 0);
    assert!(first.contains("/P0 Do") && first.contains("/P1 Do") && first.contains("/P3 Do"));
    assert!(!first.contains("/P2 Do"));
    let second = page_content(output.document(), 1);
    assert!(second.contains("/P4 Do") && second.contains("/P7 Do"));
    assert!(!second.contains("/P6 Do"));
}

#[test]
fn test_copies_are_identical() {
    let doc = source("copies.pdf", create_letter_pdf(2));
    let adjustments = AdjustmentSpec {
        copies: NonZeroUsize::new(3).unwrap(),
        ..AdjustmentSpec::default()
    };
    let outputs = compose_document(&doc, &adjustments, PaperFormat::A4).unwrap();

    assert_eq!(outputs.len(), 3);
    let first_bytes = outputs[0].to_bytes().unwrap();
    for (copy_index, output) in outputs.iter().enumerate() {
        assert_eq!(output.to_bytes().unwrap(), first_bytes);
        assert!(output.origins().iter().all(|origin| {
            origin.copy_index == copy_index && origin.document_id.as_str() == "copies.pdf"
        }));
    }
}

#[test]
fn test_unsupported_content() {
    let doc = SourceDocument::from_bytes("notes.txt", b"just text".to_vec()).unwrap();
    let result = compose_document(&doc, &AdjustmentSpec::default(), PaperFormat::A4);

    match result {
        Err(ComposeError::UnsupportedFormat { document_id, .. }) => {
            assert_eq!(document_id.as_str(), "notes.txt");
        }
        other => panic!("Expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn test_embedding_failure_reports_page() {
    let doc = source("broken.pdf", create_broken_pdf(3, 1));
    let result = compose_document(&doc, &AdjustmentSpec::default(), PaperFormat::A4);

    match result {
        Err(ComposeError::EmbeddingFailure {
            document_id,
            page_index,
            ..
        }) => {
            assert_eq!(document_id.as_str(), "broken.pdf");
            assert_eq!(page_index, 1);
        }
        other => panic!("Expected EmbeddingFailure, got {other:?}"),
    }
}

#[test]
fn test_unselected_broken_page_is_ignored() {
    let doc = source("broken.pdf", create_broken_pdf(3, 1));
    let adjustments = AdjustmentSpec {
        page_range: PageRange::Specific("1,3".into()),
        ..AdjustmentSpec::default()
    };
    let output = single_copy(compose_document(&doc, &adjustments, PaperFormat::A4).unwrap());
    assert_eq!(output.page_count(), 2);
}

#[test]
fn test_raster_source_uses_paper_size() {
    let doc = SourceDocument::from_bytes("photo.png", png_bytes(30, 60)).unwrap();
    let adjustments = AdjustmentSpec {
        rotation: Rotation::Clockwise270,
        scale: Scale::new(50.0).unwrap(),
        copies: NonZeroUsize::new(2).unwrap(),
        ..AdjustmentSpec::default()
    };
    let outputs = compose_document(&doc, &adjustments, PaperFormat::LEGAL).unwrap();

    assert_eq!(outputs.len(), 2);
    assert_eq!(page_sizes(outputs[0].document()), vec![(612.0, 1008.0)]);
    // The raster page is placed unrotated and unscaled
    assert_eq!(
        page_content(outputs[0].document(), 0),
        "q 1 0 0 1 0 0 cm /P0 Do Q\n"
    );
    assert_eq!(outputs[0].origins()[0].rotation, Rotation::Clockwise270);
}

#[test]
fn test_raster_in_nup_grid() {
    let doc = SourceDocument::from_bytes("photo.png", png_bytes(10, 10)).unwrap();
    let output = single_copy(
        compose_document(&doc, &nup(2, 2, FillMode::Replicate), PaperFormat::A4).unwrap(),
    );
    assert_eq!(output.page_count(), 1);
    assert_eq!(page_sizes(output.document()), vec![(595.0, 842.0)]);
    assert_eq!(page_content(output.document(), 0).matches("/P0 Do").count(), 4);
}

#[test]
fn test_undecodable_raster_is_embedding_failure() {
    let doc =
        SourceDocument::from_bytes("broken.png", b"\x89PNG\r\n\x1a\ntruncated".to_vec()).unwrap();
    let result = compose_document(&doc, &AdjustmentSpec::default(), PaperFormat::A4);
    assert!(matches!(
        result,
        Err(ComposeError::EmbeddingFailure { page_index: 0, .. })
    ));
}

#[test]
fn test_preview_is_first_copy() {
    let doc = source("preview.pdf", create_letter_pdf(4));
    let adjustments = AdjustmentSpec {
        copies: NonZeroUsize::new(5).unwrap(),
        ..nup(2, 1, FillMode::Sequential)
    };

    let preview = preview_document(&doc, &adjustments, PaperFormat::A4).unwrap();
    let copies = compose_document(&doc, &adjustments, PaperFormat::A4).unwrap();

    assert_eq!(preview.page_count(), 2);
    assert_eq!(preview.to_bytes().unwrap(), copies[0].to_bytes().unwrap());
}

#[test]
fn test_output_reloads() {
    let doc = source("reload.pdf", create_letter_pdf(5));
    let output = single_copy(
        compose_document(&doc, &nup(2, 2, FillMode::Sequential), PaperFormat::A4).unwrap(),
    );
    let bytes = output.to_bytes().unwrap();

    let reloaded = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(reloaded.get_pages().len(), 2);
}
