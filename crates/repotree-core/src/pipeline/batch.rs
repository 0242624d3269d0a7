//! Bounded parallel batch runner

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use super::{extension_of, panic_message, Pipeline};
use crate::model::{FileError, FileInfo, PipelineResult};

/// Worker count used when none is configured
#[must_use]
pub fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get)
}

/// Process every path on at most `jobs` blocking workers
///
/// Returns exactly one result per input path, in input order, whatever
/// order the workers finish in. A worker that dies still yields a
/// failed result for its path.
pub async fn run_batch(
    pipeline: Arc<Pipeline>,
    paths: Vec<PathBuf>,
    jobs: usize,
) -> Vec<PipelineResult> {
    let jobs = jobs.max(1);
    info!("Processing {} files with {} workers", paths.len(), jobs);

    let permits = Arc::new(Semaphore::new(jobs));
    let mut tasks = JoinSet::new();

    for (index, path) in paths.iter().cloned().enumerate() {
        let permits = Arc::clone(&permits);
        let pipeline = Arc::clone(&pipeline);
        tasks.spawn(async move {
            // The semaphore is never closed, so acquiring only waits
            let _permit = permits.acquire_owned().await;
            let outcome = tokio::task::spawn_blocking(move || pipeline.process(&path)).await;
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<PipelineResult>> = paths.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(result))) => slots[index] = Some(result),
            Ok((index, Err(join_error))) => {
                let reason = if join_error.is_panic() {
                    panic_message(join_error.into_panic().as_ref())
                } else {
                    join_error.to_string()
                };
                error!("Worker for {} died: {}", paths[index].display(), reason);
                slots[index] = Some(worker_failure(&paths[index], &reason));
            }
            Err(join_error) => error!("Batch task failed: {}", join_error),
        }
    }

    slots
        .into_iter()
        .zip(&paths)
        .map(|(slot, path)| slot.unwrap_or_else(|| worker_failure(path, "task lost")))
        .collect()
}

fn worker_failure(path: &std::path::Path, reason: &str) -> PipelineResult {
    PipelineResult::failure(
        path,
        extension_of(path),
        FileInfo::default(),
        FileError::Parse(format!("worker failed: {reason}")),
    )
}

/// Success and failure counts for a finished batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Failure count per `FileError::kind`
    pub failures_by_kind: BTreeMap<&'static str, usize>,
}

impl BatchSummary {
    #[must_use]
    pub fn from_results(results: &[PipelineResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result.error() {
                None => summary.succeeded += 1,
                Some(error) => {
                    summary.failed += 1;
                    *summary.failures_by_kind.entry(error.kind()).or_default() += 1;
                }
            }
        }
        summary
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} succeeded, {} failed", self.succeeded, self.failed)
    }
}
