//! Multi-document combination
//!
//! Documents are composed in the caller's order and their copies appended
//! one after another. Unlike composition, combining is best-effort: a
//! document that fails is reported in its [`FileOutcome`] and the rest of
//! the batch still prints.

use crate::compose::compose_document;
use crate::document::{OutputDocument, SourceDocument};
use crate::options::AdjustmentSpec;
use crate::render::PageTreeBuilder;
use crate::types::*;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// One entry of a print batch
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub document: SourceDocument,
    /// `None` prints the document as is (one copy, every page, 100%)
    pub adjustments: Option<AdjustmentSpec>,
}

impl PrintJob {
    pub fn new(document: SourceDocument, adjustments: Option<AdjustmentSpec>) -> Self {
        Self {
            document,
            adjustments,
        }
    }

    /// The adjustments to compose with, defaults filled in
    pub fn effective_adjustments(&self) -> Cow<'_, AdjustmentSpec> {
        match &self.adjustments {
            Some(adjustments) => Cow::Borrowed(adjustments),
            None => Cow::Owned(AdjustmentSpec::default()),
        }
    }
}

/// What happened to one document of a batch
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Ok {
        document_id: DocumentId,
        /// Pages contributed to the output, all copies included
        page_count: usize,
    },
    Failed {
        document_id: DocumentId,
        cause: Arc<ComposeError>,
    },
}

impl FileOutcome {
    pub fn document_id(&self) -> &DocumentId {
        match self {
            FileOutcome::Ok { document_id, .. } | FileOutcome::Failed { document_id, .. } => {
                document_id
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, FileOutcome::Ok { .. })
    }
}

/// Compose every job and combine the results into one output document.
///
/// Output order is document 1 copy 1, document 1 copy 2, ..., document 2
/// copy 1, and so on. Failed documents contribute no pages.
pub fn combine_for_printing(
    jobs: &[PrintJob],
    paper: PaperFormat,
) -> (OutputDocument, Vec<FileOutcome>) {
    let results = jobs.iter().map(|job| {
        let result = compose_document(&job.document, &job.effective_adjustments(), paper);
        (job.document.id().clone(), result)
    });
    assemble(results)
}

/// Combine already composed documents, in the order given.
///
/// Each item is one document's composition result: its copies, or the
/// error that stopped it.
pub fn assemble(
    results: impl IntoIterator<Item = (DocumentId, Result<Vec<OutputDocument>>)>,
) -> (OutputDocument, Vec<FileOutcome>) {
    let mut builder = PageTreeBuilder::new();
    let mut origins = Vec::new();
    let mut outcomes = Vec::new();
    let mut needs_pruning = false;

    for (document_id, result) in results {
        let pages_before = builder.page_count();

        let appended = result.and_then(|copies| {
            let mut page_origins = Vec::new();
            for copy in &copies {
                append_output(&mut builder, copy)?;
                page_origins.extend_from_slice(copy.origins());
            }
            Ok(page_origins)
        });

        match appended {
            Ok(page_origins) => {
                log::info!(
                    "Added {} page(s) from {}",
                    page_origins.len(),
                    document_id
                );
                outcomes.push(FileOutcome::Ok {
                    document_id,
                    page_count: page_origins.len(),
                });
                origins.extend(page_origins);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", document_id, e);
                if builder.page_count() > pages_before {
                    builder.truncate(pages_before);
                    needs_pruning = true;
                }
                outcomes.push(FileOutcome::Failed {
                    document_id,
                    cause: Arc::new(e),
                });
            }
        }
    }

    let mut document = builder.finish();
    if needs_pruning {
        document.prune_objects();
    }

    (OutputDocument::new(document, origins), outcomes)
}

/// Append every page of one composed copy
fn append_output(builder: &mut PageTreeBuilder, output: &OutputDocument) -> Result<()> {
    let source = output.document();
    // Object ids are only meaningful within one source document
    let mut cache = HashMap::new();
    for page_id in source.get_pages().into_values() {
        builder.import_page(source, page_id, &mut cache)?;
    }
    Ok(())
}
