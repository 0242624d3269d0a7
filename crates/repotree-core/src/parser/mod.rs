//! Parser module: Per-language structural parsers and their registry
//!
//! Every parser turns one file into a root `Module` node plus the flat
//! list of comments found in it. Comments are never attached here; the
//! association pass does that once the tree is complete.

mod javascript;
mod markdown;
mod python;
mod registry;
mod syntax;
mod text;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{Comment, FileInfo, NodeKind, StructuralNode};
use crate::scanner::Language;

pub use javascript::JavaScriptParser;
pub use markdown::MarkdownParser;
pub use python::PythonParser;
pub use registry::ParserRegistry;
pub use text::{base_metrics, clean_docstring, count_blank_lines, count_code_lines, physical_line_count};

/// Errors raised while parsing a single file
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not valid UTF-8")]
    Decode(PathBuf),

    #[error("syntax error at line {line}: {message}")]
    Syntax { line: u32, message: String },

    #[error("grammar error: {0}")]
    Grammar(String),
}

/// What a parser receives for one file
#[derive(Debug, Clone)]
pub struct ParserInput {
    pub path: PathBuf,
    pub file_info: FileInfo,
}

impl ParserInput {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, file_info: FileInfo) -> Self {
        Self {
            path: path.into(),
            file_info,
        }
    }

    /// Build the root `Module` node for `source`
    ///
    /// The root is named after the file stem, spans every physical line
    /// and carries the shared line metrics.
    #[must_use]
    pub fn module_root(&self, language: Language, source: &str) -> StructuralNode {
        let name = self
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
        let mut root = StructuralNode::new(
            NodeKind::Module,
            name,
            language.name(),
            self.path.to_string_lossy(),
            1,
            physical_line_count(source),
        );
        root.metrics = base_metrics(source);
        root
    }
}

/// A parsed file: the node tree and the comments found beside it
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub root: StructuralNode,
    /// In source order
    pub comments: Vec<Comment>,
}

/// A structural parser for one language
///
/// Implementations are stateless with respect to files and are shared
/// across worker threads.
pub trait Parser: Send + Sync {
    /// Language this parser produces nodes for
    fn language(&self) -> Language;

    /// Parse one file
    ///
    /// An empty tree is a successful result; errors are reserved for
    /// unreadable, undecodable or malformed input.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded, or if its
    /// content is not valid for the language.
    fn parse(&self, input: &ParserInput) -> Result<ParsedFile, ParseError>;
}

/// Read a whole file as strict UTF-8
///
/// # Errors
/// Returns `ParseError::Io` if the file cannot be read and
/// `ParseError::Decode` if it is not valid UTF-8.
pub fn read_source(path: &Path) -> Result<String, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| ParseError::Decode(path.to_path_buf()))
}

#[cfg(test)]
mod tests;
