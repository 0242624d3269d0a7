//! Per-file pipeline results and collection output

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::node::StructuralNode;
use crate::scanner::hash_file;

/// File-level metadata computed before parsing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Size in bytes
    pub size: u64,
    /// SHA-256 of the content, hex encoded
    pub sha256: Option<String>,
}

impl FileInfo {
    /// Read size and content hash of a file
    ///
    /// A file that can be stat'ed but not read gets no hash.
    ///
    /// # Errors
    /// Returns an error if the file metadata cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            size: metadata.len(),
            sha256: hash_file(path),
        })
    }
}

/// Why a single file produced no tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    #[error("io error: {0}")]
    Io(String),

    /// Expected outcome for extensions without a registered parser
    #[error("no parser")]
    NoParser,

    #[error("{0}")]
    Parse(String),

    #[error("processor {name} failed: {message}")]
    Processor { name: String, message: String },
}

impl FileError {
    /// Short machine-readable category
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::NoParser => "no_parser",
            Self::Parse(_) => "parse",
            Self::Processor { .. } => "processor",
        }
    }
}

/// Outcome of running one file through the pipeline
///
/// `outcome` holds either the root node or the failure, never both.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub path: PathBuf,
    /// Language tag of the parser, or the bare extension when none matched
    pub language: String,
    pub file_info: FileInfo,
    pub outcome: Result<StructuralNode, FileError>,
}

impl PipelineResult {
    #[must_use]
    pub fn success(
        path: impl Into<PathBuf>,
        language: impl Into<String>,
        file_info: FileInfo,
        root: StructuralNode,
    ) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            file_info,
            outcome: Ok(root),
        }
    }

    #[must_use]
    pub fn failure(
        path: impl Into<PathBuf>,
        language: impl Into<String>,
        file_info: FileInfo,
        error: FileError,
    ) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            file_info,
            outcome: Err(error),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    #[must_use]
    pub fn root(&self) -> Option<&StructuralNode> {
        self.outcome.as_ref().ok()
    }

    #[must_use]
    pub fn error(&self) -> Option<&FileError> {
        self.outcome.as_ref().err()
    }
}

/// Files accepted and rejected by the collector
///
/// Every regular file under the root lands in exactly one list.
/// Directories and symlinks appear in neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionResult {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}
