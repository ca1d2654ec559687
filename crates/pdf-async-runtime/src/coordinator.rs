//! Debounced, latest-wins preview regeneration
//!
//! Every request restarts the debounce timer, so a burst of edits produces
//! one run. Each run takes the next generation number when it starts, and
//! its result is only published if no later run has started in the
//! meantime. Superseded runs are never aborted; their output is dropped.

use crate::{Preview, PreviewCommand, PreviewUpdate, RuntimeError, combine_concurrently};
use pdf_compose::{FileOutcome, PaperFormat, PrintJob};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, sleep_until};

/// Quiet period after the last edit before a preview is generated
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewConfig {
    pub debounce: Duration,
    /// Give up on a run after this long. The run keeps going; only its
    /// result is ignored.
    pub timeout: Option<Duration>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            timeout: None,
        }
    }
}

pub struct PreviewCoordinator;

impl PreviewCoordinator {
    /// Start a coordinator on the current tokio runtime.
    ///
    /// Returns the handle for sending requests and the receiver updates
    /// arrive on.
    pub fn spawn(
        paper: PaperFormat,
        config: PreviewConfig,
    ) -> (PreviewHandle, mpsc::UnboundedReceiver<PreviewUpdate>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(coordinator_task(paper, config, command_rx, update_tx));

        (PreviewHandle { command_tx, task }, update_rx)
    }
}

/// Sending side of a running coordinator
pub struct PreviewHandle {
    command_tx: mpsc::UnboundedSender<PreviewCommand>,
    task: JoinHandle<()>,
}

impl PreviewHandle {
    /// Submit the current batch. Replaces any batch still waiting out the
    /// debounce.
    pub fn request(&self, jobs: Vec<PrintJob>) -> Result<(), RuntimeError> {
        self.command_tx
            .send(PreviewCommand::Request { jobs })
            .map_err(|_| RuntimeError::Closed)
    }

    /// Stop the coordinator and wait for it to finish.
    ///
    /// Runs already in flight complete and are published first; a batch
    /// still waiting out the debounce is dropped.
    pub async fn shutdown(self) {
        let _ = self.command_tx.send(PreviewCommand::Shutdown);
        if let Err(e) = self.task.await {
            log::warn!("Preview coordinator ended abnormally: {}", e);
        }
    }
}

// =============================================================================
// Coordinator Loop
// =============================================================================

type RunResult = (u64, Result<Preview, String>);

/// Tracks which run is the latest one
#[derive(Debug, Default)]
pub(crate) struct Generations {
    current: u64,
}

impl Generations {
    /// Tag a run that is starting now
    pub(crate) fn begin(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        generation == self.current
    }
}

async fn coordinator_task(
    paper: PaperFormat,
    config: PreviewConfig,
    mut command_rx: mpsc::UnboundedReceiver<PreviewCommand>,
    update_tx: mpsc::UnboundedSender<PreviewUpdate>,
) {
    let mut generations = Generations::default();
    let mut pending: Option<Vec<PrintJob>> = None;
    let mut deadline: Option<Instant> = None;
    let mut runs: JoinSet<RunResult> = JoinSet::new();

    loop {
        tokio::select! {
            command = command_rx.recv() => match command {
                Some(PreviewCommand::Request { jobs }) => {
                    if pending.replace(jobs).is_some() {
                        log::debug!("Discarding queued preview request, using newer request");
                    }
                    deadline = Some(Instant::now() + config.debounce);
                }
                Some(PreviewCommand::Shutdown) | None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                if let Some(jobs) = pending.take() {
                    let generation = generations.begin();
                    log::debug!(
                        "Starting preview generation {} for {} file(s)",
                        generation,
                        jobs.len()
                    );
                    runs.spawn(run_preview(generation, jobs, paper, config.timeout));
                }
            }
            Some(joined) = runs.join_next(), if !runs.is_empty() => match joined {
                Ok((generation, result)) => {
                    publish(&generations, generation, result, &update_tx);
                }
                Err(e) => log::warn!("Preview task failed: {}", e),
            },
        }
    }

    // In-flight runs are not aborted
    while let Some(joined) = runs.join_next().await {
        if let Ok((generation, result)) = joined {
            publish(&generations, generation, result, &update_tx);
        }
    }
}

/// Send a finished run to the front-end unless a newer run has started.
///
/// Returns whether the result was sent.
pub(crate) fn publish(
    generations: &Generations,
    generation: u64,
    result: Result<Preview, String>,
    update_tx: &mpsc::UnboundedSender<PreviewUpdate>,
) -> bool {
    if !generations.is_current(generation) {
        // Dropping the result releases the preview bytes
        log::warn!("Discarding stale preview generation {}", generation);
        return false;
    }

    let update = match result {
        Ok(preview) => PreviewUpdate::Ready {
            generation,
            preview,
        },
        Err(reason) => {
            log::warn!("No preview for generation {}: {}", generation, reason);
            PreviewUpdate::Unavailable { generation, reason }
        }
    };
    update_tx.send(update).is_ok()
}

async fn run_preview(
    generation: u64,
    jobs: Vec<PrintJob>,
    paper: PaperFormat,
    timeout: Option<Duration>,
) -> RunResult {
    let work = build_preview(jobs, paper);
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, work)
            .await
            .unwrap_or_else(|_| Err(format!("Preview generation timed out after {limit:?}"))),
        None => work.await,
    };
    (generation, result)
}

async fn build_preview(jobs: Vec<PrintJob>, paper: PaperFormat) -> Result<Preview, String> {
    if jobs.is_empty() {
        return Err("No files to preview".to_string());
    }

    let (output, outcomes) = combine_concurrently(jobs, paper)
        .await
        .map_err(|e| e.to_string())?;

    if output.page_count() == 0 {
        return Err(describe_failures(&outcomes));
    }

    let page_count = output.page_count();
    let bytes = tokio::task::spawn_blocking(move || output.to_bytes())
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())?;

    Ok(Preview {
        bytes,
        page_count,
        outcomes,
    })
}

fn describe_failures(outcomes: &[FileOutcome]) -> String {
    let failures: Vec<String> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            FileOutcome::Failed { cause, .. } => Some(cause.to_string()),
            FileOutcome::Ok { .. } => None,
        })
        .collect();

    if failures.is_empty() {
        "Nothing selected to print".to_string()
    } else {
        failures.join("; ")
    }
}
