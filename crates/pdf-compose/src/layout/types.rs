//! Layout data types for composition
//!
//! These types represent the intermediate layout calculations between
//! page selection and PDF rendering.

use crate::constants::MAX_GRID_DIMENSION;
use crate::types::{ComposeError, Result, Rotation};

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Columns × rows of an N-up sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutGrid {
    columns: usize,
    rows: usize,
}

impl LayoutGrid {
    /// The 1×1 grid: one source page per output page
    pub const SINGLE: LayoutGrid = LayoutGrid {
        columns: 1,
        rows: 1,
    };

    /// Both dimensions must lie in `1..=MAX_GRID_DIMENSION`.
    pub fn new(columns: usize, rows: usize) -> Result<Self> {
        let range = 1..=MAX_GRID_DIMENSION;
        if !range.contains(&columns) || !range.contains(&rows) {
            return Err(ComposeError::InvalidAdjustment(format!(
                "layout needs 1 to {MAX_GRID_DIMENSION} columns and rows (got {columns}×{rows})"
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Row-major position of a cell index
    pub fn position(&self, cell_index: usize) -> GridPosition {
        GridPosition::new(cell_index / self.columns, cell_index % self.columns)
    }

    pub fn is_single(&self) -> bool {
        self.cell_count() == 1
    }
}

impl Default for LayoutGrid {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// One output sheet of an N-up composition.
///
/// Holds exactly `cell_count` slots in row-major order; `None` is a blank cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionSheet {
    pub cells: Vec<Option<usize>>,
}

impl CompositionSheet {
    /// Cells that show a page, as `(cell_index, source_page)`
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(cell, page)| page.map(|page| (cell, page)))
    }

    pub fn blank_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Where and how a piece of content is drawn
///
/// `x`/`y` is the point the content's own lower-left corner is pinned to;
/// the rotation pivots around that corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    /// Drawn width before rotation
    pub width: f32,
    /// Drawn height before rotation
    pub height: f32,
    /// Uniform factor from content units to points
    pub scale: f32,
    pub rotation: Rotation,
}

impl Placement {
    /// PDF `cm` operands that draw the content with this placement
    pub fn matrix(&self) -> [f32; 6] {
        let (sin, cos) = self.rotation.sin_cos();
        let s = self.scale;
        [s * cos, s * sin, -s * sin, s * cos, self.x, self.y]
    }

    /// Size of the content as seen on the page, after rotation
    pub fn visible_size(&self) -> (f32, f32) {
        if self.rotation.is_quarter_turn() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// A source page placed on an output page
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlacement {
    /// Index of the source page
    pub source_page: usize,
    /// Grid cell holding the page (0 for single-page output)
    pub cell_index: usize,
    pub placement: Placement,
}

/// Everything needed to render one output page
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub width_pt: f32,
    pub height_pt: f32,
    pub placements: Vec<PagePlacement>,
}
