//! repotree-core: Core library for structural extraction of source repositories
//!
//! Walks a repository, parses recognized files into a uniform tree of
//! structural nodes (modules, classes, functions, imports, headings, code
//! blocks), attaches comments and marker tags to the smallest enclosing node,
//! and publishes the result as JSON or newline-delimited JSON.
//!
//! # Built-in parsers
//!
//! - **python** - tree-sitter-python (`.py`)
//! - **javascript** - tree-sitter-javascript (`.js`, `.jsx`, `.mjs`, `.cjs`)
//! - **markdown** - line scanner (`.md`, `.markdown`)

pub mod association;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod publisher;
pub mod scanner;
pub mod version;

// Re-export commonly used types
pub use model::{
    CollectionResult, Comment, Dependency, DependencyKind, FileError, FileInfo, NodeKind,
    PipelineResult, StructuralNode,
};
pub use parser::{
    JavaScriptParser, MarkdownParser, ParseError, ParsedFile, Parser, ParserInput, ParserRegistry,
    PythonParser,
};
pub use pipeline::{default_jobs, run_batch, BatchSummary, Pipeline, Processor, SummaryMetrics};
pub use publisher::{
    encode_records, flatten, publish, write_records, write_values, FailureEntry, FlattenMode,
    NodeRecord, OutputConfig, OutputFormat, PublishError, PublishReport, Sink,
};
pub use scanner::{
    CollectError, Collector, CollectorConfig, IgnoreCache, Language, SkipReason,
};
pub use version::ScanRun;
