use crate::constants::MAX_GRID_DIMENSION;
use crate::layout::LayoutGrid;
use crate::types::*;
use std::num::NonZeroUsize;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Validated per-document adjustments.
///
/// Every field is a checked type, so a value of this struct is always
/// usable by the pipeline. Build it from loose input with
/// `AdjustmentSpec::try_from(settings)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "AdjustmentSettings", into = "AdjustmentSettings")
)]
pub struct AdjustmentSpec {
    pub scale: Scale,
    pub rotation: Rotation,
    pub copies: NonZeroUsize,
    pub page_range: PageRange,
    pub layout: LayoutGrid,
    pub fill_mode: FillMode,
    /// One flag per grid cell, row-major. Ignored unless it has exactly
    /// `layout.cell_count()` entries.
    pub enabled_cells: Vec<bool>,
}

impl Default for AdjustmentSpec {
    fn default() -> Self {
        Self {
            scale: Scale::IDENTITY,
            rotation: Rotation::None,
            copies: NonZeroUsize::MIN,
            page_range: PageRange::All,
            layout: LayoutGrid::SINGLE,
            fill_mode: FillMode::Sequential,
            enabled_cells: Vec::new(),
        }
    }
}

impl AdjustmentSpec {
    /// Source pages per output page
    pub fn pages_per_sheet(&self) -> usize {
        self.layout.cell_count()
    }

    /// Load adjustments from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let settings: AdjustmentSettings = serde_json::from_slice(&bytes)
            .map_err(|e| ComposeError::Config(format!("Failed to parse adjustments: {}", e)))?;
        Self::try_from(settings)
    }

    /// Save adjustments to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            ComposeError::Config(format!("Failed to serialize adjustments: {}", e))
        })?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

// =============================================================================
// Wire Form
// =============================================================================

/// Whether a page-number expression applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PageRangeMode {
    #[default]
    All,
    Specific,
}

/// Adjustments as a front-end sends them: loosely typed, every key
/// optional. Unknown keys (such as the derived `pagesPerPage`) are ignored.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct AdjustmentSettings {
    pub scale: f32,
    pub rotation: i32,
    pub copies: i64,
    pub page_range: PageRangeMode,
    pub page_numbers: String,
    pub layout_columns: i64,
    pub layout_rows: i64,
    pub page_mode: FillMode,
    pub enabled_grid_positions: Vec<bool>,
}

impl Default for AdjustmentSettings {
    fn default() -> Self {
        Self {
            scale: 100.0,
            rotation: 0,
            copies: 1,
            page_range: PageRangeMode::All,
            page_numbers: String::new(),
            layout_columns: 1,
            layout_rows: 1,
            page_mode: FillMode::Sequential,
            enabled_grid_positions: Vec::new(),
        }
    }
}

impl TryFrom<AdjustmentSettings> for AdjustmentSpec {
    type Error = ComposeError;

    fn try_from(settings: AdjustmentSettings) -> Result<Self> {
        let copies = usize::try_from(settings.copies)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| {
                ComposeError::InvalidAdjustment(format!(
                    "copies must be at least 1 (got {})",
                    settings.copies
                ))
            })?;

        let columns = grid_dimension("layoutColumns", settings.layout_columns)?;
        let rows = grid_dimension("layoutRows", settings.layout_rows)?;

        let page_range = match settings.page_range {
            PageRangeMode::All => PageRange::All,
            PageRangeMode::Specific => PageRange::Specific(settings.page_numbers),
        };

        Ok(Self {
            scale: Scale::new(settings.scale)?,
            rotation: Rotation::try_from(settings.rotation)?,
            copies,
            page_range,
            layout: LayoutGrid::new(columns, rows)?,
            fill_mode: settings.page_mode,
            enabled_cells: settings.enabled_grid_positions,
        })
    }
}

impl From<AdjustmentSpec> for AdjustmentSettings {
    fn from(spec: AdjustmentSpec) -> Self {
        let (page_range, page_numbers) = match spec.page_range {
            PageRange::All => (PageRangeMode::All, String::new()),
            PageRange::Specific(expr) => (PageRangeMode::Specific, expr),
        };

        Self {
            scale: spec.scale.percent(),
            rotation: spec.rotation.degrees(),
            copies: spec.copies.get() as i64,
            page_range,
            page_numbers,
            layout_columns: spec.layout.columns() as i64,
            layout_rows: spec.layout.rows() as i64,
            page_mode: spec.fill_mode,
            enabled_grid_positions: spec.enabled_cells,
        }
    }
}

fn grid_dimension(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .filter(|v| (1..=MAX_GRID_DIMENSION).contains(v))
        .ok_or_else(|| {
            ComposeError::InvalidAdjustment(format!(
                "{name} must be between 1 and {MAX_GRID_DIMENSION} (got {value})"
            ))
        })
}
