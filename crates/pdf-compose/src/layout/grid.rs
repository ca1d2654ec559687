//! Grid cell geometry
//!
//! Splits a sheet into equal cells and insets each one by the cell margin.

use crate::constants::CELL_MARGIN_PT;

use super::{LayoutGrid, Rect};

/// Calculate the usable rectangle of a cell on a sheet.
///
/// Cells are numbered row-major with row 0 at the top of the sheet, so the
/// y coordinate is inverted relative to the row index. A cell smaller than
/// twice the margin collapses to zero size rather than going negative.
///
/// # Arguments
/// * `grid` - The grid layout
/// * `cell_index` - Row-major cell index
/// * `sheet_width_pt` - Sheet width in points
/// * `sheet_height_pt` - Sheet height in points
pub fn cell_rect(
    grid: &LayoutGrid,
    cell_index: usize,
    sheet_width_pt: f32,
    sheet_height_pt: f32,
) -> Rect {
    let pos = grid.position(cell_index);
    let cell_width = sheet_width_pt / grid.columns() as f32;
    let cell_height = sheet_height_pt / grid.rows() as f32;

    let x = pos.col as f32 * cell_width + CELL_MARGIN_PT;
    let y = sheet_height_pt - (pos.row + 1) as f32 * cell_height + CELL_MARGIN_PT;

    Rect::new(
        x,
        y,
        (cell_width - 2.0 * CELL_MARGIN_PT).max(0.0),
        (cell_height - 2.0 * CELL_MARGIN_PT).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_by_two_cells() {
        let grid = LayoutGrid::new(2, 2).unwrap();

        // Top-left
        let top_left = cell_rect(&grid, 0, 600.0, 800.0);
        assert_eq!(top_left, Rect::new(10.0, 410.0, 280.0, 380.0));

        // Bottom-right
        let bottom_right = cell_rect(&grid, 3, 600.0, 800.0);
        assert_eq!(bottom_right, Rect::new(310.0, 10.0, 280.0, 380.0));
    }

    #[test]
    fn test_row_major_numbering() {
        let grid = LayoutGrid::new(3, 2).unwrap();
        let cell = cell_rect(&grid, 4, 300.0, 200.0);
        // Cell 4 of a 3-column grid is row 1, column 1
        assert_eq!(cell.x, 110.0);
        assert_eq!(cell.y, 10.0);
    }

    #[test]
    fn test_tiny_cells_collapse() {
        let grid = LayoutGrid::new(5, 5).unwrap();
        let cell = cell_rect(&grid, 0, 50.0, 50.0);
        assert_eq!(cell.width, 0.0);
        assert_eq!(cell.height, 0.0);
    }
}
