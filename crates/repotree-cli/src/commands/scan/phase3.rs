//! Phase 3: Publish the report and list failed files

use anyhow::Result;
use repotree_core::{publish, OutputConfig, PipelineResult, PublishReport};
use tracing::info;

/// Run Phase 3: Write successes to the sink
///
/// # Errors
/// Returns an error if the report cannot be serialized or written.
pub fn run(results: &[PipelineResult], config: &OutputConfig) -> Result<PublishReport> {
    info!("Phase 3: Publishing report...");

    let report = publish(results, config)?;
    print_failures(results);
    Ok(report)
}

/// List failed files with their errors on stderr
pub fn print_failures(results: &[PipelineResult]) {
    let failed: Vec<&PipelineResult> = results.iter().filter(|r| !r.is_success()).collect();
    if failed.is_empty() {
        return;
    }

    eprintln!("Failed files:");
    for result in failed {
        if let Some(error) = result.error() {
            eprintln!("  {}: {}", result.path.display(), error);
        }
    }
}
