//! Scanner module: File collection, ignore rules and hashing
//!
//! Responsible for walking the repository root, applying ignore files
//! and the built-in ignore list, and partitioning every regular file
//! into accepted or skipped.

mod collector;
mod hash;
mod ignore_cache;
mod language;

pub use collector::{
    is_test_path, CollectError, Collector, CollectorConfig, SkipReason, ALWAYS_IGNORED,
    DEFAULT_MAX_FILE_SIZE,
};
pub use hash::{compute_file_hash, hash_file, is_likely_binary};
pub use ignore_cache::{IgnoreCache, IGNORE_FILES};
pub use language::Language;

#[cfg(test)]
mod tests;
