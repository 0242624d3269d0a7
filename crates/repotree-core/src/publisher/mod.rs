//! Publisher module: Flattens results and writes the report
//!
//! Successful results become flat records written as one JSON array or
//! as NDJSON; failed results are returned and logged separately and never
//! reach the report.

mod record;
mod writer;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::model::PipelineResult;

pub use record::{flatten, NodeRecord};
pub use writer::{encode_records, write_records, write_values};

/// Errors raised while publishing
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialize node {node_id} from {path}: {source}")]
    Serialize {
        path: String,
        node_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode output: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to create {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Record granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlattenMode {
    /// One record per node, pre-order
    #[default]
    Node,
    /// One record per file: the root only
    File,
}

/// Report encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single pretty-printed array
    #[default]
    Json,
    /// One compact object per line
    Ndjson,
}

impl OutputFormat {
    /// File name used when no output path is configured
    #[must_use]
    pub const fn default_file_name(self) -> &'static str {
        match self {
            Self::Json => "analysis.json",
            Self::Ndjson => "analysis.ndjson",
        }
    }
}

/// Resolved report destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    File(PathBuf),
    Stdout,
}

/// Publisher settings
///
/// Flattening, format and destination are independent.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub flatten: FlattenMode,
    pub format: OutputFormat,
    /// Explicit output file; `None` means the default name in the
    /// working directory
    pub output: Option<PathBuf>,
    pub to_stdout: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn with_flatten(mut self, flatten: FlattenMode) -> Self {
        self.flatten = flatten;
        self
    }

    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    #[must_use]
    pub const fn with_stdout(mut self, to_stdout: bool) -> Self {
        self.to_stdout = to_stdout;
        self
    }

    /// Where the report goes
    ///
    /// # Errors
    /// Returns an error if the default location is needed and the working
    /// directory cannot be determined.
    pub fn sink(&self) -> Result<Sink, PublishError> {
        if self.to_stdout {
            return Ok(Sink::Stdout);
        }
        match &self.output {
            Some(path) => Ok(Sink::File(path.clone())),
            None => Ok(Sink::File(
                std::env::current_dir()?.join(self.format.default_file_name()),
            )),
        }
    }
}

/// A file left out of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEntry {
    pub path: PathBuf,
    /// `FileError::kind` of the failure
    pub kind: &'static str,
    pub error: String,
}

/// What a publish run wrote and what it left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub records_written: usize,
    pub failures: Vec<FailureEntry>,
    pub sink: Sink,
}

/// Write the report for `results` to the configured sink
///
/// # Errors
/// Returns an error if a record cannot be serialized or the sink cannot
/// be written. Per-file failures are not errors; they are returned in
/// the report.
pub fn publish(
    results: &[PipelineResult],
    config: &OutputConfig,
) -> Result<PublishReport, PublishError> {
    let records: Vec<NodeRecord> = results
        .iter()
        .flat_map(|result| flatten(result, config.flatten))
        .collect();
    let failures = collect_failures(results);
    // An existing report is only replaced once every record converts
    let values = encode_records(&records)?;

    let sink = config.sink()?;
    match &sink {
        Sink::Stdout => {
            let stdout = io::stdout();
            write_values(BufWriter::new(stdout.lock()), &values, config.format)?;
        }
        Sink::File(path) => {
            write_values(BufWriter::new(create_output(path)?), &values, config.format)?;
            info!(
                "Analysis saved to {} ({} ok, {} failed)",
                path.display(),
                results.len() - failures.len(),
                failures.len()
            );
        }
    }

    Ok(PublishReport {
        records_written: records.len(),
        failures,
        sink,
    })
}

fn collect_failures(results: &[PipelineResult]) -> Vec<FailureEntry> {
    results
        .iter()
        .filter_map(|result| {
            let error = result.error()?;
            error!("Failed to analyze {}: {}", result.path.display(), error);
            Some(FailureEntry {
                path: result.path.clone(),
                kind: error.kind(),
                error: error.to_string(),
            })
        })
        .collect()
}

fn create_output(path: &Path) -> Result<File, PublishError> {
    File::create(path).map_err(|source| PublishError::CreateOutput {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests;
