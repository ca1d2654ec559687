//! Per-document composition
//!
//! This module orchestrates one document's pipeline:
//! 1. Turn raster content into a page (or reject unsupported content)
//! 2. Select pages from the page range
//! 3. Plan single pages or N-up sheets
//! 4. Embed every used source page once and render the plans
//! 5. Replicate the result into the requested number of copies
//!
//! Failures are strict: the first page that can't be embedded aborts the
//! document and nothing partial is returned.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::document::{OutputDocument, PageOrigin, SourceContent, SourceDocument};
use crate::layout::{SheetPlan, compose_sheets, plan_nup_sheets, plan_single_pages};
use crate::options::AdjustmentSpec;
use crate::page_range::select_pages;
use crate::raster::rasterize;
use crate::render::{PageTreeBuilder, create_page_xobject, get_page_dimensions};
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::collections::{BTreeMap, HashMap};

/// Compose one document, returning one output per requested copy.
///
/// All copies are identical; the document is rendered once and cloned.
///
/// # Arguments
/// * `document` - The source document
/// * `adjustments` - Validated adjustments for this document
/// * `paper` - Paper format raster content is placed on
pub fn compose_document(
    document: &SourceDocument,
    adjustments: &AdjustmentSpec,
    paper: PaperFormat,
) -> Result<Vec<OutputDocument>> {
    let composed = compose_once(document, adjustments, paper)?;
    let page_count = composed.get_pages().len();

    log::debug!(
        "Composed {} into {} page(s) × {} copies",
        document.id(),
        page_count,
        adjustments.copies
    );

    Ok((0..adjustments.copies.get())
        .map(|copy_index| {
            let origin = PageOrigin {
                document_id: document.id().clone(),
                copy_index,
                rotation: adjustments.rotation,
            };
            OutputDocument::new(composed.clone(), vec![origin; page_count])
        })
        .collect())
}

/// Compose the first copy only, for previewing a single document.
pub fn preview_document(
    document: &SourceDocument,
    adjustments: &AdjustmentSpec,
    paper: PaperFormat,
) -> Result<OutputDocument> {
    let composed = compose_once(document, adjustments, paper)?;
    let page_count = composed.get_pages().len();
    let origin = PageOrigin {
        document_id: document.id().clone(),
        copy_index: 0,
        rotation: adjustments.rotation,
    };
    Ok(OutputDocument::new(composed, vec![origin; page_count]))
}

fn compose_once(
    document: &SourceDocument,
    adjustments: &AdjustmentSpec,
    paper: PaperFormat,
) -> Result<Document> {
    match document.content() {
        SourceContent::Pages(source) => compose_pages(document.id(), source, adjustments),
        SourceContent::Raster { bytes, .. } => {
            let source = rasterize(bytes, adjustments.rotation, adjustments.scale, paper)
                .map_err(embedding_failure(document.id(), 0))?;

            // Rotation and scale are already in the pixels
            let remaining = AdjustmentSpec {
                scale: Scale::IDENTITY,
                rotation: Rotation::None,
                ..adjustments.clone()
            };
            compose_pages(document.id(), &source, &remaining)
        }
        SourceContent::Unsupported { media_type } => Err(document.unsupported(media_type)),
    }
}

/// Render a vector page document under the given adjustments.
fn compose_pages(
    document_id: &DocumentId,
    source: &Document,
    adjustments: &AdjustmentSpec,
) -> Result<Document> {
    let page_ids: Vec<ObjectId> = source.get_pages().values().copied().collect();
    let selected = select_pages(&adjustments.page_range, page_ids.len());

    let mut dimensions = BTreeMap::new();
    for &page in &selected {
        let size = get_page_dimensions(source, page_ids[page])
            .map_err(embedding_failure(document_id, page))?;
        dimensions.insert(page, size);
    }

    let plans = plan_sheets(&selected, &dimensions, adjustments);

    let mut builder = PageTreeBuilder::new();
    let mut xobjects: HashMap<usize, ObjectId> = HashMap::new();
    let mut cache = HashMap::new();

    for plan in &plans {
        for placed in &plan.placements {
            let page = placed.source_page;
            if xobjects.contains_key(&page) {
                continue;
            }
            let xobject_id =
                create_page_xobject(builder.document_mut(), source, page_ids[page], &mut cache)
                    .map_err(embedding_failure(document_id, page))?;
            xobjects.insert(page, xobject_id);
        }
        builder.push_sheet(plan, &xobjects);
    }

    Ok(builder.finish())
}

/// Plan every output page of one copy
fn plan_sheets(
    selected: &[usize],
    dimensions: &BTreeMap<usize, (f32, f32)>,
    adjustments: &AdjustmentSpec,
) -> Vec<SheetPlan> {
    if adjustments.layout.is_single() {
        return plan_single_pages(
            selected,
            dimensions,
            adjustments.scale,
            adjustments.rotation,
        );
    }

    let sheets = compose_sheets(
        selected,
        &adjustments.layout,
        adjustments.fill_mode,
        &adjustments.enabled_cells,
    );

    // Every sheet takes the size of the first selected page
    let sheet_size = selected
        .first()
        .and_then(|page| dimensions.get(page))
        .copied()
        .unwrap_or(DEFAULT_PAGE_DIMENSIONS);

    plan_nup_sheets(
        &sheets,
        &adjustments.layout,
        sheet_size,
        dimensions,
        adjustments.scale,
        adjustments.rotation,
    )
}

fn embedding_failure(
    document_id: &DocumentId,
    page_index: usize,
) -> impl FnOnce(ComposeError) -> ComposeError + '_ {
    move |source| ComposeError::EmbeddingFailure {
        document_id: document_id.clone(),
        page_index,
        source: Box::new(source),
    }
}
