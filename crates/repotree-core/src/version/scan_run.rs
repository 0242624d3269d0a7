//! Scan run builder and git integration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One invocation of the extraction pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRun {
    pub id: String,
    pub repo_path: String,
    pub commit_sha: Option<String>,
    pub branch: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanRun {
    /// Create a new scan run
    #[must_use]
    pub fn new(repo_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            repo_path: repo_path.into(),
            commit_sha: None,
            branch: None,
            scanned_at: Utc::now(),
        }
    }

    /// Set the commit SHA
    #[must_use]
    pub fn with_commit(mut self, sha: impl Into<String>) -> Self {
        self.commit_sha = Some(sha.into());
        self
    }

    /// Set the branch
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Fill commit and branch from the enclosing git repository, if any
    #[must_use]
    pub fn with_git_info(mut self) -> Self {
        let Ok(repo) = git2::Repository::discover(&self.repo_path) else {
            return self;
        };
        if let Ok(head) = repo.head() {
            if let Some(oid) = head.target() {
                self.commit_sha = Some(oid.to_string());
            }
            if let Some(name) = head.shorthand() {
                self.branch = Some(name.to_string());
            }
        }
        self
    }
}

impl std::fmt::Display for ScanRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scan {} of {}", self.id, self.repo_path)?;
        if let Some(branch) = &self.branch {
            write!(f, " on {branch}")?;
        }
        if let Some(sha) = &self.commit_sha {
            let short: String = sha.chars().take(12).collect();
            write!(f, " @ {short}")?;
        }
        Ok(())
    }
}
