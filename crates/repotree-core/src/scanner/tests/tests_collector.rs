//! Tests for the file collector

#![allow(clippy::expect_used)]

use crate::scanner::{
    is_test_path, CollectError, Collector, CollectorConfig, IgnoreCache, SkipReason,
};
use rstest::rstest;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn names(paths: &[PathBuf]) -> BTreeSet<String> {
    paths
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .map(str::to_string)
        .collect()
}

fn collect(root: &Path, config: CollectorConfig) -> crate::model::CollectionResult {
    Collector::new(config)
        .collect(root, &mut IgnoreCache::new())
        .expect("Failed to collect")
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create dir");
    }
    fs::write(path, content).expect("Failed to write file");
}

// ============================================================================
// Root validation
// ============================================================================

#[test]
fn test_collect_nonexistent_root_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err = Collector::default()
        .collect(&temp_dir.path().join("no-such-dir"), &mut IgnoreCache::new())
        .expect_err("missing root must fail");
    assert!(matches!(err, CollectError::NotFound(_)));
}

#[cfg(unix)]
#[test]
fn test_collect_unresolvable_root_is_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let a = temp_dir.path().join("a");
    let b = temp_dir.path().join("b");
    std::os::unix::fs::symlink(&b, &a).expect("Failed to create symlink");
    std::os::unix::fs::symlink(&a, &b).expect("Failed to create symlink");

    let err = Collector::default()
        .collect(&a, &mut IgnoreCache::new())
        .expect_err("symlink loop must fail");
    match err {
        CollectError::Io { path, source } => {
            assert_eq!(path, a);
            assert_ne!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_collect_file_root_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "solo.py", "x = 1\n");

    let err = Collector::default()
        .collect(&temp_dir.path().join("solo.py"), &mut IgnoreCache::new())
        .expect_err("file root must fail");
    assert!(matches!(err, CollectError::NotADirectory(_)));
}

#[test]
fn test_collect_empty_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = collect(temp_dir.path(), CollectorConfig::default());
    assert!(result.files.is_empty());
    assert!(result.skipped.is_empty());
}

// ============================================================================
// Ignore rules
// ============================================================================

#[test]
fn test_collect_gitignore_excludes_compiled_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body: String = (1..=50).map(|i| format!("x{i} = {i}\n")).collect();
    write(temp_dir.path(), "a.py", &body);
    write(temp_dir.path(), "a.pyc", "compiled");
    write(temp_dir.path(), ".gitignore", "*.pyc\n");

    let result = collect(temp_dir.path(), CollectorConfig::default());

    assert_eq!(names(&result.files), BTreeSet::from(["a.py".to_string()]));
    assert!(names(&result.skipped).contains("a.pyc"));
}

#[test]
fn test_collect_always_ignored_and_hidden() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "main.py", "print('ok')\n");
    write(temp_dir.path(), ".git/config", "[core]\n");
    write(temp_dir.path(), "__pycache__/main.py", "x = 1\n");
    write(temp_dir.path(), "node_modules/pkg/index.js", "module.exports = 1;\n");
    write(temp_dir.path(), ".hidden/secret.py", "x = 1\n");
    write(temp_dir.path(), ".env.py", "x = 1\n");

    let result = collect(temp_dir.path(), CollectorConfig::default());

    assert_eq!(result.files.len(), 1);
    assert!(result.files[0].ends_with("main.py"));
    assert_eq!(result.skipped.len(), 5);
}

#[test]
fn test_collect_respects_project_ignore_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), ".repotreeignore", "*.py\n");
    write(temp_dir.path(), "keep.py", "print('ok')\n");
    write(temp_dir.path(), "skip.py", "print('no')\n");
    write(temp_dir.path(), "README.md", "# Title\n");

    let result = collect(temp_dir.path(), CollectorConfig::default());

    assert_eq!(names(&result.files), BTreeSet::from(["README.md".to_string()]));
}

#[test]
fn test_collect_ignored_directory_pattern() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), ".gitignore", "generated/\n");
    write(temp_dir.path(), "generated/out.py", "x = 1\n");
    write(temp_dir.path(), "src/app.py", "x = 1\n");

    let result = collect(temp_dir.path(), CollectorConfig::default());

    assert_eq!(names(&result.files), BTreeSet::from(["app.py".to_string()]));
    assert!(names(&result.skipped).contains("out.py"));
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_collect_extension_allow_list() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "a.py", "x = 1\n");
    write(temp_dir.path(), "b.md", "# B\n");
    write(temp_dir.path(), "c.txt", "plain\n");

    let default = collect(temp_dir.path(), CollectorConfig::default());
    assert_eq!(
        names(&default.files),
        BTreeSet::from(["a.py".to_string(), "b.md".to_string()])
    );

    let restricted = collect(
        temp_dir.path(),
        CollectorConfig::default().with_extensions([".PY", "txt"]),
    );
    assert_eq!(
        names(&restricted.files),
        BTreeSet::from(["a.py".to_string(), "c.txt".to_string()])
    );
}

#[test]
fn test_collect_excludes_tests_by_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "foo.py", "x = 1\n");
    write(temp_dir.path(), "test_foo.py", "x = 2\n");
    write(temp_dir.path(), "tests/helpers.py", "x = 3\n");

    let excluded = collect(temp_dir.path(), CollectorConfig::default());
    assert_eq!(names(&excluded.files), BTreeSet::from(["foo.py".to_string()]));

    let included = collect(
        temp_dir.path(),
        CollectorConfig::default().with_include_tests(true),
    );
    assert_eq!(included.files.len(), 3);
}

#[test]
fn test_collect_size_and_binary_filters() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "small.py", "x = 1\n");
    write(temp_dir.path(), "large.py", &"#".repeat(200));
    fs::write(temp_dir.path().join("blob.py"), [b'x', 0, b'y']).expect("Failed to write file");

    let result = collect(
        temp_dir.path(),
        CollectorConfig::default().with_max_file_size(100),
    );

    assert_eq!(names(&result.files), BTreeSet::from(["small.py".to_string()]));
    assert_eq!(
        names(&result.skipped),
        BTreeSet::from(["blob.py".to_string(), "large.py".to_string()])
    );
}

#[test]
fn test_classify_reports_reason() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path().canonicalize().expect("Failed to resolve root");
    write(&root, "notes.txt", "plain\n");
    write(&root, "test_a.py", "x = 1\n");

    let mut cache = IgnoreCache::new();
    let matcher = cache.matcher(&root).expect("Failed to build matcher");
    let collector = Collector::default();

    assert_eq!(
        collector.classify(&root, &root.join("notes.txt"), &matcher),
        Some(SkipReason::Extension)
    );
    assert_eq!(
        collector.classify(&root, &root.join("test_a.py"), &matcher),
        Some(SkipReason::TestFile)
    );
}

// ============================================================================
// Partition and determinism
// ============================================================================

#[test]
fn test_collect_partitions_every_regular_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let layout = [
        "a.py",
        "b.md",
        "c.txt",
        "src/d.py",
        "src/test_d.py",
        "build/out.py",
        ".cache/x.py",
        "docs/guide.md",
    ];
    for rel in layout {
        write(temp_dir.path(), rel, "x\n");
    }

    let result = collect(temp_dir.path(), CollectorConfig::default());

    let files: BTreeSet<_> = result.files.iter().collect();
    let skipped: BTreeSet<_> = result.skipped.iter().collect();
    assert!(files.is_disjoint(&skipped));
    assert_eq!(result.files.len() + result.skipped.len(), layout.len());
}

#[test]
fn test_collect_is_deterministic() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    for rel in ["z.py", "a.py", "m/b.md", "m/a.js"] {
        write(temp_dir.path(), rel, "x\n");
    }

    let first = collect(temp_dir.path(), CollectorConfig::default());
    let second = collect(temp_dir.path(), CollectorConfig::default());
    assert_eq!(first, second);
}

#[cfg(unix)]
#[test]
fn test_collect_skips_symlinks_from_both_lists() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "real.py", "x = 1\n");
    std::os::unix::fs::symlink(
        temp_dir.path().join("real.py"),
        temp_dir.path().join("link.py"),
    )
    .expect("Failed to create symlink");
    std::os::unix::fs::symlink(temp_dir.path(), temp_dir.path().join("loop"))
        .expect("Failed to create symlink");

    let result = collect(temp_dir.path(), CollectorConfig::default());

    assert_eq!(names(&result.files), BTreeSet::from(["real.py".to_string()]));
    assert!(result.skipped.is_empty());
}

#[test]
fn test_ignore_cache_reuses_matchers() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path().canonicalize().expect("Failed to resolve root");
    let mut cache = IgnoreCache::new();
    assert!(cache.is_empty());

    let collector = Collector::default();
    collector.collect(&root, &mut cache).expect("Failed to collect");
    collector.collect(&root, &mut cache).expect("Failed to collect");
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

// ============================================================================
// Test-file conventions
// ============================================================================

#[rstest]
#[case("test_app.py", true)]
#[case("test-app.py", true)]
#[case("app_test.py", true)]
#[case("app.test.js", true)]
#[case("app.spec.js", true)]
#[case("tests/helpers.py", true)]
#[case("src/__tests__/util.js", true)]
#[case("pkg/test/data.md", true)]
#[case("app.py", false)]
#[case("contest.py", false)]
#[case("latest/app.py", false)]
#[case("testing.md", false)]
fn test_is_test_path(#[case] path: &str, #[case] expected: bool) {
    assert_eq!(is_test_path(Path::new(path)), expected);
}
