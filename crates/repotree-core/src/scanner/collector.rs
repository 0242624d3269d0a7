//! File collector: Partitions a directory tree into candidate and skipped files

use std::collections::BTreeSet;
use std::io;
use std::path::{Component, Path, PathBuf};

use ignore::gitignore::Gitignore;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{is_likely_binary, IgnoreCache, Language};
use crate::model::CollectionResult;

/// Default upper bound on file size, in bytes
pub const DEFAULT_MAX_FILE_SIZE: u64 = 2_000_000;

/// Names that exclude any path containing them as a segment
pub const ALWAYS_IGNORED: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "__pycache__",
    ".venv",
    "venv",
    "env",
    ".mypy_cache",
    ".pytest_cache",
    "dist",
    "build",
    "node_modules",
    "target",
    ".tox",
    ".DS_Store",
    ".idea",
    ".vscode",
];

const TEST_DIRS: &[&str] = &["tests", "test", "__tests__"];

/// Errors that prevent a collection from starting or finishing
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Repository path '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("Repository path '{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to resolve repository path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to walk repository: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to load ignore rules: {0}")]
    Ignore(#[from] ignore::Error),
}

/// Why a file was placed in the skipped list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlwaysIgnored,
    Hidden,
    IgnoreFile,
    Extension,
    TestFile,
    TooLarge,
    Binary,
    Unreadable,
    /// Fifo, socket or device
    NotRegular,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AlwaysIgnored => "always ignored",
            Self::Hidden => "hidden",
            Self::IgnoreFile => "ignore file",
            Self::Extension => "extension not allowed",
            Self::TestFile => "test file",
            Self::TooLarge => "too large",
            Self::Binary => "binary",
            Self::Unreadable => "unreadable",
            Self::NotRegular => "not a regular file",
        };
        write!(f, "{s}")
    }
}

/// Collector settings
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Lowercase extensions without the dot; `None` allows every
    /// extension of a built-in language
    pub allowed_extensions: Option<BTreeSet<String>>,
    pub include_tests: bool,
    pub max_file_size: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: None,
            include_tests: false,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl CollectorConfig {
    /// Restrict collection to the given extensions
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = Some(
            extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        );
        self
    }

    /// Include files that follow a test naming convention
    #[must_use]
    pub const fn with_include_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }

    /// Set the maximum file size in bytes
    #[must_use]
    pub const fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    fn allows_extension(&self, ext: &str) -> bool {
        match &self.allowed_extensions {
            Some(allowed) => allowed.contains(ext),
            None => Language::from_extension(ext).is_some(),
        }
    }
}

/// Walks a repository root and partitions its regular files
#[derive(Debug, Clone, Default)]
pub struct Collector {
    config: CollectorConfig,
}

impl Collector {
    #[must_use]
    pub const fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Collect candidate files under `root`
    ///
    /// The root is resolved to an absolute path first. Symlinks are never
    /// followed and, like directories, appear in neither output list.
    ///
    /// # Errors
    /// Returns an error if the root is missing or not a directory, if the
    /// root itself cannot be read, or if the ignore rules fail to compile.
    pub fn collect(
        &self,
        root: &Path,
        cache: &mut IgnoreCache,
    ) -> Result<CollectionResult, CollectError> {
        let root = root.canonicalize().map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => CollectError::NotFound(root.to_path_buf()),
            _ => CollectError::Io {
                path: root.to_path_buf(),
                source,
            },
        })?;
        if !root.is_dir() {
            return Err(CollectError::NotADirectory(root));
        }

        let matcher = cache.matcher(&root)?;
        let mut result = CollectionResult::default();

        for entry in WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() || file_type.is_symlink() {
                continue;
            }

            let reason = if file_type.is_file() {
                self.classify(&root, entry.path(), &matcher)
            } else {
                Some(SkipReason::NotRegular)
            };

            match reason {
                None => result.files.push(entry.into_path()),
                Some(reason) => {
                    debug!("Skipping {} ({})", entry.path().display(), reason);
                    result.skipped.push(entry.into_path());
                }
            }
        }

        info!(
            "Collected {} files ({} skipped) under {}",
            result.files.len(),
            result.skipped.len(),
            root.display()
        );
        Ok(result)
    }

    /// Decide whether a regular file under `root` is skipped, and why
    ///
    /// Checks run cheapest first; the file content is only read for the
    /// binary sniff.
    #[must_use]
    pub fn classify(&self, root: &Path, path: &Path, matcher: &Gitignore) -> Option<SkipReason> {
        let rel = path.strip_prefix(root).unwrap_or(path);
        let segments: Vec<&str> = rel
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => name.to_str(),
                _ => None,
            })
            .collect();

        if segments.iter().any(|s| ALWAYS_IGNORED.contains(s)) {
            return Some(SkipReason::AlwaysIgnored);
        }
        if segments.iter().any(|s| s.starts_with('.')) {
            return Some(SkipReason::Hidden);
        }
        if matcher.matched_path_or_any_parents(rel, false).is_ignore() {
            return Some(SkipReason::IgnoreFile);
        }

        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !self.config.allows_extension(&ext) {
            return Some(SkipReason::Extension);
        }

        if !self.config.include_tests && is_test_path(rel) {
            return Some(SkipReason::TestFile);
        }

        match path.metadata() {
            Ok(metadata) if metadata.len() > self.config.max_file_size => {
                return Some(SkipReason::TooLarge);
            }
            Ok(_) => {}
            Err(_) => return Some(SkipReason::Unreadable),
        }

        if is_likely_binary(path) {
            return Some(SkipReason::Binary);
        }
        None
    }
}

/// Whether a path follows a test-file naming convention
///
/// Matches `test_*`, `test-*`, `*_test.*`, `*.test.*` and `*.spec.*` file
/// names, and any file under a `tests`, `test` or `__tests__` directory.
#[must_use]
pub fn is_test_path(path: &Path) -> bool {
    let in_test_dir = path
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .any(|component| match component {
            Component::Normal(name) => name.to_str().is_some_and(|n| TEST_DIRS.contains(&n)),
            _ => false,
        });
    if in_test_dir {
        return true;
    }

    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);

    name.starts_with("test_")
        || name.starts_with("test-")
        || stem.ends_with("_test")
        || name.contains(".test.")
        || name.contains(".spec.")
}
