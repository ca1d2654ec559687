use pdf_compose::{
    ComposeError, DocumentId, FileOutcome, OutputDocument, PaperFormat, PrintJob, Result, assemble,
    compose_document,
};
use tokio::task::JoinHandle;

/// Compose every job on its own blocking task, then combine the results.
///
/// Documents are composed concurrently, but the output follows the order
/// of `jobs` whatever order the tasks finish in. A task that panics counts
/// as a failure of its document. The result is identical to
/// [`pdf_compose::combine_for_printing`] on the same jobs.
pub async fn combine_concurrently(
    jobs: Vec<PrintJob>,
    paper: PaperFormat,
) -> Result<(OutputDocument, Vec<FileOutcome>)> {
    let tasks: Vec<(DocumentId, JoinHandle<Result<Vec<OutputDocument>>>)> = jobs
        .into_iter()
        .map(|job| {
            let id = job.document.id().clone();
            let task = tokio::task::spawn_blocking(move || {
                compose_document(&job.document, &job.effective_adjustments(), paper)
            });
            (id, task)
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());
    for (id, task) in tasks {
        let result = task.await.unwrap_or_else(|e| Err(ComposeError::TaskJoin(e)));
        results.push((id, result));
    }

    Ok(tokio::task::spawn_blocking(move || assemble(results)).await?)
}
