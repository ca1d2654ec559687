mod combine;
mod compose;
mod config;
mod constants;
mod document;
mod io;
pub mod layout;
mod options;
mod page_range;
mod raster;
pub mod render;
mod stats;
mod types;

pub use combine::{FileOutcome, PrintJob, assemble, combine_for_printing};
pub use compose::{compose_document, preview_document};
pub use config::*;
pub use constants::*;
pub use document::{OutputDocument, PageOrigin, SourceContent, SourceDocument};
pub use io::{load_pdf, load_source, save_pdf};
pub use options::*;
pub use page_range::{parse_page_numbers, select_pages};
pub use raster::raster_to_document;
pub use stats::{CompositionStatistics, calculate_statistics};
pub use types::*;
