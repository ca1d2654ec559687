//! Job files
//!
//! A job file is a JSON array of entries, one per document, in print order:
//!
//! ```json
//! [
//!   { "path": "handout.pdf", "adjustments": { "layoutColumns": 2 } },
//!   { "path": "photo.jpg" }
//! ]
//! ```
//!
//! Relative paths are resolved against the job file's directory.

use anyhow::{Context, Result};
use pdf_compose::{
    AdjustmentSettings, AdjustmentSpec, ComposeError, DocumentId, FileOutcome, PrintJob,
    load_source,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobEntry {
    pub path: PathBuf,
    /// Validated per entry when the batch loads
    #[serde(default)]
    pub adjustments: Option<AdjustmentSettings>,
}

impl JobEntry {
    fn validated_adjustments(&self) -> Result<Option<AdjustmentSpec>, ComposeError> {
        self.adjustments
            .clone()
            .map(AdjustmentSpec::try_from)
            .transpose()
    }
}

/// Jobs ready to combine, plus the entries that could not be loaded
pub struct LoadedBatch {
    pub jobs: Vec<PrintJob>,
    /// Position in the job file and the failure for that entry
    pub failures: Vec<(usize, FileOutcome)>,
}

pub fn parse_job_file(text: &str) -> Result<Vec<JobEntry>> {
    serde_json::from_str(text).context("Invalid job file")
}

/// Read a job file and load every document it names.
///
/// An entry with invalid adjustments or an unreadable document is recorded
/// as a failure and the rest of the batch still loads.
pub async fn load_batch(path: &Path) -> Result<LoadedBatch> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read job file {}", path.display()))?;
    let entries = parse_job_file(&text)?;
    let base = path.parent().unwrap_or(Path::new("."));

    let mut batch = LoadedBatch {
        jobs: Vec::with_capacity(entries.len()),
        failures: Vec::new(),
    };

    for (index, entry) in entries.into_iter().enumerate() {
        let source_path = base.join(&entry.path);
        let loaded = match entry.validated_adjustments() {
            Ok(adjustments) => load_source(&source_path)
                .await
                .map(|document| PrintJob::new(document, adjustments)),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(job) => batch.jobs.push(job),
            Err(e) => {
                log::warn!("Could not load {}: {}", source_path.display(), e);
                batch.failures.push((
                    index,
                    FileOutcome::Failed {
                        document_id: DocumentId::new(entry.path.display().to_string()),
                        cause: Arc::new(e),
                    },
                ));
            }
        }
    }

    Ok(batch)
}

/// Put load failures back at their job file positions among the combiner's
/// outcomes
pub fn merge_outcomes(
    combined: Vec<FileOutcome>,
    failures: Vec<(usize, FileOutcome)>,
) -> Vec<FileOutcome> {
    let mut merged = Vec::with_capacity(combined.len() + failures.len());
    let mut combined = combined.into_iter();
    let mut failures = failures.into_iter().peekable();

    loop {
        if let Some((_, failure)) = failures.next_if(|(index, _)| *index == merged.len()) {
            merged.push(failure);
        } else if let Some(outcome) = combined.next() {
            merged.push(outcome);
        } else {
            // Positions past the end of the combined list
            merged.extend(failures.map(|(_, failure)| failure));
            return merged;
        }
    }
}

pub fn describe(outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Ok {
            document_id,
            page_count,
        } => format!("  ok      {} ({} pages)", document_id, page_count),
        FileOutcome::Failed { document_id, cause } => {
            format!("  failed  {}: {}", document_id, describe_cause(cause))
        }
    }
}

fn describe_cause(cause: &ComposeError) -> String {
    match cause {
        ComposeError::Io(e) => format!("cannot read file ({e})"),
        other => other.to_string(),
    }
}
