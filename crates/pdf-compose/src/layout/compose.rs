//! Sheet composition
//!
//! Turns a page selection into output sheets:
//! - Single-page layout: one output page per selected page, sized like it
//! - N-up layout: pages grouped onto grid sheets by fill mode
//!
//! Disabled cells are blanked in place; they never shift which page the
//! other cells receive.

use std::collections::BTreeMap;

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::types::{FillMode, Rotation, Scale};

use super::{
    CompositionSheet, FitMode, LayoutGrid, PagePlacement, Rect, SheetPlan, cell_rect,
    plan_placement,
};

/// Normalize per-cell enable flags to the grid's cell count.
///
/// A list whose length doesn't match the grid is ignored and every cell is
/// enabled.
pub fn effective_enabled_cells(enabled_cells: &[bool], cell_count: usize) -> Vec<bool> {
    if enabled_cells.len() == cell_count {
        enabled_cells.to_vec()
    } else {
        vec![true; cell_count]
    }
}

/// Number of sheets a selection needs, before any rendering.
pub fn sheet_count(selected_pages: usize, grid: &LayoutGrid, fill_mode: FillMode) -> usize {
    match fill_mode {
        FillMode::Replicate => selected_pages,
        FillMode::Sequential => selected_pages.div_ceil(grid.cell_count()),
    }
}

/// Group selected pages into composition sheets.
///
/// # Arguments
/// * `selected` - Selected source page indices, in output order
/// * `grid` - The sheet grid
/// * `fill_mode` - Sequential batches or one replicated page per sheet
/// * `enabled_cells` - Per-cell enable flags (see [`effective_enabled_cells`])
pub fn compose_sheets(
    selected: &[usize],
    grid: &LayoutGrid,
    fill_mode: FillMode,
    enabled_cells: &[bool],
) -> Vec<CompositionSheet> {
    let cell_count = grid.cell_count();
    let enabled = effective_enabled_cells(enabled_cells, cell_count);

    match fill_mode {
        FillMode::Sequential => selected
            .chunks(cell_count)
            .map(|batch| CompositionSheet {
                cells: (0..cell_count)
                    .map(|cell| batch.get(cell).copied().filter(|_| enabled[cell]))
                    .collect(),
            })
            .collect(),
        FillMode::Replicate => selected
            .iter()
            .map(|&page| CompositionSheet {
                cells: enabled.iter().map(|&on| on.then_some(page)).collect(),
            })
            .collect(),
    }
}

/// Plan single-page output: each selected page keeps its own page size and
/// is placed against the full page.
pub fn plan_single_pages(
    selected: &[usize],
    source_dimensions: &BTreeMap<usize, (f32, f32)>,
    scale: Scale,
    rotation: Rotation,
) -> Vec<SheetPlan> {
    selected
        .iter()
        .map(|&page| {
            let (width, height) = dimensions_of(source_dimensions, page);
            let bounds = Rect::new(0.0, 0.0, width, height);
            SheetPlan {
                width_pt: width,
                height_pt: height,
                placements: vec![PagePlacement {
                    source_page: page,
                    cell_index: 0,
                    placement: plan_placement(
                        &bounds,
                        width,
                        height,
                        scale,
                        rotation,
                        FitMode::Overflow,
                    ),
                }],
            }
        })
        .collect()
}

/// Plan N-up output: every sheet is `sheet_size` and each filled cell is
/// fitted and centred inside its inset cell rectangle.
pub fn plan_nup_sheets(
    sheets: &[CompositionSheet],
    grid: &LayoutGrid,
    sheet_size: (f32, f32),
    source_dimensions: &BTreeMap<usize, (f32, f32)>,
    scale: Scale,
    rotation: Rotation,
) -> Vec<SheetPlan> {
    let (sheet_width, sheet_height) = sheet_size;

    sheets
        .iter()
        .map(|sheet| SheetPlan {
            width_pt: sheet_width,
            height_pt: sheet_height,
            placements: sheet
                .filled()
                .map(|(cell, page)| {
                    let bounds = cell_rect(grid, cell, sheet_width, sheet_height);
                    let (width, height) = dimensions_of(source_dimensions, page);
                    PagePlacement {
                        source_page: page,
                        cell_index: cell,
                        placement: plan_placement(
                            &bounds,
                            width,
                            height,
                            scale,
                            rotation,
                            FitMode::Contain,
                        ),
                    }
                })
                .collect(),
        })
        .collect()
}

fn dimensions_of(source_dimensions: &BTreeMap<usize, (f32, f32)>, page: usize) -> (f32, f32) {
    source_dimensions
        .get(&page)
        .copied()
        .unwrap_or(DEFAULT_PAGE_DIMENSIONS)
}
