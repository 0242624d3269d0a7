//! Per-run cache of compiled ignore-file matchers

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, warn};

/// Ignore files read from the repository root, in precedence order
pub const IGNORE_FILES: [&str; 2] = [".gitignore", ".repotreeignore"];

/// Compiled ignore matchers keyed by repository root
///
/// Build one per run and hand it to the collector. Nothing is shared
/// between caches, so separate runs never see each other's patterns.
#[derive(Debug, Default)]
pub struct IgnoreCache {
    matchers: HashMap<PathBuf, Arc<Gitignore>>,
}

impl IgnoreCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the matcher for `root`, compiling it on first use
    ///
    /// Missing ignore files are not an error. Individual malformed
    /// patterns are logged and dropped.
    ///
    /// # Errors
    /// Returns an error if the matcher cannot be built.
    pub fn matcher(&mut self, root: &Path) -> Result<Arc<Gitignore>, ignore::Error> {
        if let Some(matcher) = self.matchers.get(root) {
            return Ok(Arc::clone(matcher));
        }

        let mut builder = GitignoreBuilder::new(root);
        for name in IGNORE_FILES {
            let file = root.join(name);
            if !file.is_file() {
                continue;
            }
            debug!("Loading ignore file {}", file.display());
            if let Some(err) = builder.add(&file) {
                warn!("Ignoring bad patterns in {}: {}", file.display(), err);
            }
        }

        let matcher = Arc::new(builder.build()?);
        self.matchers.insert(root.to_path_buf(), Arc::clone(&matcher));
        Ok(matcher)
    }

    /// Number of compiled matchers
    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Drop every compiled matcher
    pub fn clear(&mut self) {
        self.matchers.clear();
    }
}
