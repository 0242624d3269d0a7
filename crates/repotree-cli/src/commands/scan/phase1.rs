//! Phase 1: Collect candidate files

use std::path::{Path, PathBuf};

use anyhow::Result;
use repotree_core::{Collector, CollectorConfig, IgnoreCache};
use tracing::info;

/// Results from Phase 1
#[derive(Debug)]
pub struct Phase1Result {
    /// Canonical repository root
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Run Phase 1: Walk the root and keep files worth parsing
///
/// # Errors
/// Returns an error if the root does not exist, is not a directory, or
/// cannot be walked.
pub fn run(root: &Path, config: &CollectorConfig) -> Result<Phase1Result> {
    info!("Phase 1: Collecting files...");

    let collector = Collector::new(config.clone());
    let collected = collector.collect(root, &mut IgnoreCache::new())?;

    let root = root.canonicalize()?;
    info!(
        "Found {} files to process ({} skipped)",
        collected.files.len(),
        collected.skipped.len()
    );

    Ok(Phase1Result {
        root,
        files: collected.files,
        skipped_count: collected.skipped.len(),
    })
}
