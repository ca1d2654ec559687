//! Async front-end for the composition engine
//!
//! The engine itself is synchronous. This crate runs it on blocking tasks
//! and exchanges messages with a front-end: the front-end sends
//! [`PreviewCommand`]s and receives [`PreviewUpdate`]s.

mod coordinator;
mod parallel;

pub use coordinator::{DEFAULT_DEBOUNCE, PreviewConfig, PreviewCoordinator, PreviewHandle};
pub use parallel::combine_concurrently;

// Re-export types from library crates
pub use pdf_compose::{FileOutcome, PaperFormat, PrintJob};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Preview coordinator has stopped")]
    Closed,
}

/// Commands sent from a front-end to the preview coordinator
#[derive(Debug)]
pub enum PreviewCommand {
    /// The batch changed; regenerate once edits settle
    Request { jobs: Vec<PrintJob> },
    /// Stop accepting commands. Runs already started still finish.
    Shutdown,
}

/// Updates sent from the preview coordinator to a front-end
#[derive(Debug, Clone)]
pub enum PreviewUpdate {
    Ready {
        generation: u64,
        preview: Preview,
    },
    /// No preview for this generation; the next edit tries again
    Unavailable { generation: u64, reason: String },
}

impl PreviewUpdate {
    pub fn generation(&self) -> u64 {
        match self {
            PreviewUpdate::Ready { generation, .. }
            | PreviewUpdate::Unavailable { generation, .. } => *generation,
        }
    }
}

/// A combined preview, exactly the bytes a print of the same batch sends
#[derive(Debug, Clone)]
pub struct Preview {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub outcomes: Vec<FileOutcome>,
}
