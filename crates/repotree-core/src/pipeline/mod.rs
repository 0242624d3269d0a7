//! Pipeline module: Per-file orchestration and the parallel batch runner
//!
//! `Pipeline::process` drives one file from metadata to a finished tree
//! and is the only place parser failures turn into `FileError`s.
//! `run_batch` fans files out over a bounded pool of blocking workers.

mod batch;
mod processor;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::association::associate;
use crate::model::{FileError, FileInfo, PipelineResult, StructuralNode};
use crate::parser::{ParseError, ParsedFile, Parser, ParserInput, ParserRegistry};

pub use batch::{default_jobs, run_batch, BatchSummary};
pub use processor::{Processor, SummaryMetrics};

/// Per-file orchestrator: metadata, parser dispatch, association, processors
pub struct Pipeline {
    registry: Arc<ParserRegistry>,
    processors: Vec<Box<dyn Processor>>,
}

impl Pipeline {
    #[must_use]
    pub fn new(registry: Arc<ParserRegistry>) -> Self {
        Self {
            registry,
            processors: Vec::new(),
        }
    }

    /// Append a post-processor; processors run in the order added
    #[must_use]
    pub fn with_processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    #[must_use]
    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Names of the configured processors, in order
    #[must_use]
    pub fn processor_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Language tag recorded for `path`: the parser's language, or the
    /// bare extension when no parser is registered
    #[must_use]
    pub fn language_for(&self, path: &Path) -> String {
        self.registry.for_path(path).map_or_else(
            || extension_of(path),
            |parser| parser.language().name().to_string(),
        )
    }

    /// Run one file through the pipeline
    ///
    /// Never panics on bad input and never returns early: every outcome,
    /// including a parser panic, is folded into the result.
    #[must_use]
    pub fn process(&self, path: &Path) -> PipelineResult {
        let language = self.language_for(path);

        let file_info = match FileInfo::from_path(path) {
            Ok(info) => info,
            Err(err) => {
                warn!("Failed to read {}: {}", path.display(), err);
                return PipelineResult::failure(
                    path,
                    language,
                    FileInfo::default(),
                    FileError::Io(err.to_string()),
                );
            }
        };

        let Some(parser) = self.registry.for_path(path) else {
            debug!("No parser for {}", path.display());
            return PipelineResult::failure(path, language, file_info, FileError::NoParser);
        };

        let input = ParserInput::new(path, file_info.clone());
        let outcome = parse_guarded(parser.as_ref(), &input).and_then(|parsed| {
            let ParsedFile { mut root, comments } = parsed;
            associate(&mut root, &comments);
            self.apply_processors(root)
        });

        match outcome {
            Ok(root) => PipelineResult::success(path, language, file_info, root),
            Err(error) => {
                warn!("Failed to process {}: {}", path.display(), error);
                PipelineResult::failure(path, language, file_info, error)
            }
        }
    }

    fn apply_processors(&self, mut root: StructuralNode) -> Result<StructuralNode, FileError> {
        for processor in &self.processors {
            root = processor
                .process(root)
                .map_err(|message| FileError::Processor {
                    name: processor.name().to_string(),
                    message,
                })?;
        }
        Ok(root)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("registry", &self.registry)
            .field("processors", &self.processor_names())
            .finish()
    }
}

/// Call a parser, converting both errors and panics into `FileError`
fn parse_guarded(parser: &dyn Parser, input: &ParserInput) -> Result<ParsedFile, FileError> {
    match catch_unwind(AssertUnwindSafe(|| parser.parse(input))) {
        Ok(Ok(parsed)) => Ok(parsed),
        Ok(Err(err @ ParseError::Io { .. })) => Err(FileError::Io(err.to_string())),
        Ok(Err(err)) => Err(FileError::Parse(err.to_string())),
        Err(payload) => Err(FileError::Parse(format!(
            "parser panicked: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests;
