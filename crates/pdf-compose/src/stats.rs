use crate::document::{SourceContent, SourceDocument};
use crate::layout::compose_sheets;
use crate::options::AdjustmentSpec;
use crate::page_range::select_pages;
use crate::types::*;

/// Page counts of a composition, worked out without rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionStatistics {
    pub source_pages: usize,
    pub selected_pages: usize,
    /// Output pages of one copy
    pub sheets_per_copy: usize,
    pub copies: usize,
    /// Output pages over all copies
    pub output_pages: usize,
    /// Empty cells in one copy (unfilled or disabled)
    pub blank_cells: usize,
}

/// Calculate statistics for composing one document
pub fn calculate_statistics(
    document: &SourceDocument,
    adjustments: &AdjustmentSpec,
) -> Result<CompositionStatistics> {
    if let SourceContent::Unsupported { media_type } = document.content() {
        return Err(document.unsupported(media_type));
    }

    let source_pages = document.page_count();
    let selected = select_pages(&adjustments.page_range, source_pages);
    let copies = adjustments.copies.get();

    let (sheets_per_copy, blank_cells) = if adjustments.layout.is_single() {
        (selected.len(), 0)
    } else {
        let sheets = compose_sheets(
            &selected,
            &adjustments.layout,
            adjustments.fill_mode,
            &adjustments.enabled_cells,
        );
        let blank = sheets.iter().map(|sheet| sheet.blank_count()).sum();
        (sheets.len(), blank)
    };

    Ok(CompositionStatistics {
        source_pages,
        selected_pages: selected.len(),
        sheets_per_copy,
        copies,
        output_pages: sheets_per_copy * copies,
        blank_cells,
    })
}
