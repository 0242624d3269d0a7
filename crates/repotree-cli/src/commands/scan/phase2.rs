//! Phase 2: Parse files on the worker pool

use std::path::PathBuf;
use std::sync::Arc;

use repotree_core::{run_batch, BatchSummary, ParserRegistry, Pipeline, PipelineResult, SummaryMetrics};
use tracing::info;

/// Results from Phase 2
#[derive(Debug)]
pub struct Phase2Result {
    /// One result per collected file, in collection order
    pub results: Vec<PipelineResult>,
    pub summary: BatchSummary,
}

/// Build the pipeline used for a scan
#[must_use]
pub fn build_pipeline(summary: bool) -> Pipeline {
    let pipeline = Pipeline::new(Arc::new(ParserRegistry::with_defaults()));
    if summary {
        pipeline.with_processor(SummaryMetrics)
    } else {
        pipeline
    }
}

/// Run Phase 2: Parse, associate comments and post-process every file
pub async fn run(files: Vec<PathBuf>, jobs: usize, summary: bool) -> Phase2Result {
    info!("Phase 2: Parsing {} files...", files.len());

    let pipeline = Arc::new(build_pipeline(summary));
    let results = run_batch(pipeline, files, jobs).await;
    let summary = BatchSummary::from_results(&results);

    info!("Phase 2 complete: {}", summary);
    Phase2Result { results, summary }
}
