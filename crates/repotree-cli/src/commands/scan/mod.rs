//! Scan command: Extract the structure of a repository into a report
//!
//! This module implements a 3-phase scan:
//! 1. Phase 1: Collect candidate files under the root
//! 2. Phase 2: Parse every file on a bounded worker pool
//! 3. Phase 3: Publish successes to the sink, list failures on stderr

mod phase1;
mod phase2;
mod phase3;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use repotree_core::{BatchSummary, CollectorConfig, OutputConfig, PublishReport, ScanRun};
use tracing::info;

pub use phase1::Phase1Result;
pub use phase2::Phase2Result;

/// Everything a scan needs, resolved from the command line
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: PathBuf,
    pub collector: CollectorConfig,
    pub output: OutputConfig,
    pub jobs: usize,
    pub fail_fast: bool,
    pub summary: bool,
}

impl ScanOptions {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            collector: CollectorConfig::default(),
            output: OutputConfig::default(),
            jobs: 1,
            fail_fast: false,
            summary: false,
        }
    }

    #[must_use]
    pub fn with_collector(mut self, collector: CollectorConfig) -> Self {
        self.collector = collector;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub const fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    #[must_use]
    pub const fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }
}

/// What a completed scan produced
#[derive(Debug)]
pub struct ScanReport {
    pub scan_run: ScanRun,
    pub summary: BatchSummary,
    pub publish: PublishReport,
}

// ============================================================================
// Main entry point
// ============================================================================

/// Run the scan command
///
/// # Errors
/// Returns an error if the root cannot be collected, if the report cannot
/// be written, or if fail-fast is set and any file failed. In the last
/// case nothing is published.
pub async fn run(options: &ScanOptions) -> Result<ScanReport> {
    info!("Scanning repository: {}", options.root.display());

    let phase1 = phase1::run(&options.root, &options.collector)?;
    let scan_run = create_scan_run(&phase1.root);
    log_scan_run_info(&scan_run);

    let phase2 = phase2::run(phase1.files, options.jobs, options.summary).await;
    eprintln!("{}", phase2.summary);
    if options.summary {
        print_failure_kinds(&phase2.summary);
    }

    if options.fail_fast && phase2.summary.has_failures() {
        phase3::print_failures(&phase2.results);
        bail!(
            "Aborting: {} of {} files failed and --fail-fast is set",
            phase2.summary.failed,
            phase2.summary.total()
        );
    }

    let publish = phase3::run(&phase2.results, &options.output)?;
    log_scan_summary(phase1.skipped_count, &phase2.summary, &publish);

    Ok(ScanReport {
        scan_run,
        summary: phase2.summary,
        publish,
    })
}

fn create_scan_run(root: &Path) -> ScanRun {
    ScanRun::new(root.display().to_string()).with_git_info()
}

fn log_scan_run_info(scan_run: &ScanRun) {
    info!(
        "Created scan run: {} (commit: {}, branch: {:?})",
        scan_run.id,
        scan_run.commit_sha.as_deref().unwrap_or("none"),
        scan_run.branch
    );
}

fn print_failure_kinds(summary: &BatchSummary) {
    for (kind, count) in &summary.failures_by_kind {
        eprintln!("  {kind}: {count}");
    }
}

fn log_scan_summary(skipped: usize, summary: &BatchSummary, publish: &PublishReport) {
    info!(
        "✓ Scan completed: {} files parsed, {} failed, {} skipped, {} records written",
        summary.succeeded, summary.failed, skipped, publish.records_written
    );
}

#[cfg(test)]
mod tests;
