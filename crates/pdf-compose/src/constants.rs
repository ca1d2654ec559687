//! Shared constants for document composition
//!
//! This module centralizes magic numbers used throughout the pipeline.

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Adjustment Limits
// =============================================================================

/// Smallest accepted content scale (percent)
pub const MIN_SCALE_PERCENT: f32 = 10.0;

/// Largest accepted content scale (percent)
pub const MAX_SCALE_PERCENT: f32 = 200.0;

/// Most columns, and most rows, an N-up grid may have
pub const MAX_GRID_DIMENSION: usize = 5;

// =============================================================================
// Margins
// =============================================================================

/// Inset applied on every side of an N-up cell (points)
pub const CELL_MARGIN_PT: f32 = 10.0;

/// Inset between a raster image and the paper edge (points)
pub const RASTER_MARGIN_PT: f32 = 50.0;

// =============================================================================
// Output
// =============================================================================

/// PDF version written for every generated document
pub const OUTPUT_PDF_VERSION: &str = "1.7";
