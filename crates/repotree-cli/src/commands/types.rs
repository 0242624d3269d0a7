//! Command argument types shared between main and library

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use repotree_core::{
    default_jobs, CollectorConfig, FlattenMode, Language, OutputConfig, OutputFormat,
};

use super::scan::ScanOptions;

/// Report encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Single pretty-printed JSON array
    #[default]
    Json,
    /// One JSON object per line
    Ndjson,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Self::Json,
            FormatArg::Ndjson => Self::Ndjson,
        }
    }
}

/// Record granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FlattenArg {
    /// One record per structural node
    #[default]
    Node,
    /// One record per file
    File,
}

impl From<FlattenArg> for FlattenMode {
    fn from(arg: FlattenArg) -> Self {
        match arg {
            FlattenArg::Node => Self::Node,
            FlattenArg::File => Self::File,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Path to the repository to scan
    pub path: PathBuf,

    /// Output file [default: analysis.json or analysis.ndjson]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the report to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,

    /// Emit one record per node or one per file
    #[arg(long, value_enum, default_value_t = FlattenArg::Node)]
    pub flatten: FlattenArg,

    /// Languages or extensions to collect, comma separated (e.g. python,md)
    #[arg(long, value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Include files that look like tests
    #[arg(long)]
    pub include_tests: bool,

    /// Exit with an error, without writing a report, if any file fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Skip files larger than this many bytes
    #[arg(long, default_value_t = repotree_core::scanner::DEFAULT_MAX_FILE_SIZE)]
    pub max_file_size: u64,

    /// Number of parallel workers [default: available cores]
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Add per-file summary metrics and print failures by kind
    #[arg(long)]
    pub summary: bool,
}

impl ScanArgs {
    /// Resolve arguments into scan options
    #[must_use]
    pub fn into_options(self) -> ScanOptions {
        let mut collector = CollectorConfig::default()
            .with_include_tests(self.include_tests)
            .with_max_file_size(self.max_file_size);
        let extensions = expand_languages(&self.languages);
        if !extensions.is_empty() {
            collector = collector.with_extensions(extensions);
        }

        let mut output = OutputConfig::default()
            .with_format(self.format.into())
            .with_flatten(self.flatten.into())
            .with_stdout(self.stdout || self.output.as_deref().is_some_and(is_stdout_path));
        if let Some(path) = self.output {
            output = output.with_output(path);
        }

        ScanOptions::new(self.path)
            .with_collector(collector)
            .with_output(output)
            .with_jobs(self.jobs.unwrap_or_else(default_jobs))
            .with_fail_fast(self.fail_fast)
            .with_summary(self.summary)
    }
}

/// Extensions for a `--languages` list
///
/// Known language names expand to all of their extensions; anything else
/// is taken as a bare extension.
#[must_use]
pub fn expand_languages(items: &[String]) -> Vec<String> {
    let mut extensions: Vec<String> = Vec::new();
    for item in items {
        let item = item.trim().trim_start_matches('.').to_lowercase();
        if item.is_empty() {
            continue;
        }
        match Language::from_name(&item) {
            Some(language) if language.name() == item => {
                extensions.extend(language.extensions().iter().map(|ext| (*ext).to_string()));
            }
            _ => extensions.push(item),
        }
    }
    extensions.sort();
    extensions.dedup();
    extensions
}

fn is_stdout_path(path: &Path) -> bool {
    path == Path::new("-") || path == Path::new("/dev/stdout")
}
