//! End-to-end tests: collect, process in parallel, publish
//!
//! These drive the public API the same way the CLI does, against a
//! scratch repository on disk.

#![allow(clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use repotree_core::{
    run_batch, BatchSummary, Collector, CollectorConfig, FileError, FlattenMode, IgnoreCache,
    NodeKind, NodeRecord, OutputConfig, OutputFormat, ParserRegistry, Pipeline, SummaryMetrics,
};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create dirs");
    }
    fs::write(path, content).expect("Failed to write file");
}

fn scratch_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    write(
        root,
        "app/main.py",
        "\"\"\"Entry point.\"\"\"\nimport os\n\n\ndef run():\n    # TODO: parse args\n    return os.getcwd()\n",
    );
    write(
        root,
        "README.md",
        "# Project\n\nSee [docs](docs/index.md).\n\n<!-- FIXME: stale -->\n",
    );
    write(root, "web/app.js", "// entry\nfunction start() {\n  return 1;\n}\n");
    write(root, "broken.py", "def broken(:\n    pass\n");
    write(root, "notes.txt", "plain text\n");
    write(root, "tests/test_main.py", "def test_run():\n    pass\n");
    write(root, ".gitignore", "*.log\n");
    write(root, "debug.log", "noise\n");
    temp_dir
}

#[tokio::test]
async fn test_full_run_reports_successes_and_isolates_failures() {
    let repo = scratch_repo();
    let collected = Collector::new(CollectorConfig::default())
        .collect(repo.path(), &mut IgnoreCache::new())
        .expect("Failed to collect");

    let names: Vec<String> = collected
        .files
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(names, vec!["README.md", "main.py", "broken.py", "app.js"]);

    let pipeline = Arc::new(
        Pipeline::new(Arc::new(ParserRegistry::with_defaults())).with_processor(SummaryMetrics),
    );
    let results = run_batch(pipeline, collected.files.clone(), 3).await;

    assert_eq!(results.len(), collected.files.len());
    for (result, path) in results.iter().zip(&collected.files) {
        assert_eq!(&result.path, path);
    }

    let summary = BatchSummary::from_results(&results);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures_by_kind.get("parse"), Some(&1));

    let broken = results
        .iter()
        .find(|r| r.path.ends_with("broken.py"))
        .expect("broken.py result");
    assert!(matches!(broken.error(), Some(FileError::Parse(_))));

    let main = results
        .iter()
        .find(|r| r.path.ends_with("main.py"))
        .and_then(|r| r.root())
        .expect("main.py tree");
    let run = main
        .nodes_of_kind(NodeKind::Function)
        .into_iter()
        .next()
        .expect("run function");
    assert_eq!(run.tags, vec!["TODO"]);
    assert!(main.tags.is_empty());
    assert_eq!(main.metrics.get("todos"), Some(&1));
}

#[tokio::test]
async fn test_published_ndjson_has_one_record_per_parsed_file() {
    let repo = scratch_repo();
    let config = CollectorConfig::default().with_extensions(["py", "md", "js", "txt"]);
    let collected = Collector::new(config)
        .collect(repo.path(), &mut IgnoreCache::new())
        .expect("Failed to collect");
    assert_eq!(collected.files.len(), 5);

    let pipeline = Arc::new(Pipeline::new(Arc::new(ParserRegistry::with_defaults())));
    let results = run_batch(pipeline, collected.files, 2).await;

    let out_dir = TempDir::new().expect("Failed to create temp dir");
    let out = out_dir.path().join("report.ndjson");
    let config = OutputConfig::default()
        .with_format(OutputFormat::Ndjson)
        .with_flatten(FlattenMode::File)
        .with_output(&out);
    let report = repotree_core::publish(&results, &config).expect("Failed to publish");

    assert_eq!(report.records_written, 3);
    let mut kinds: Vec<&str> = report.failures.iter().map(|f| f.kind).collect();
    kinds.sort_unstable();
    assert_eq!(kinds, vec!["no_parser", "parse"]);

    let content = fs::read_to_string(&out).expect("Failed to read report");
    let records: Vec<NodeRecord> = content
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid record"))
        .collect();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.kind == NodeKind::Module));
    assert!(records.iter().all(|r| r.sha256.as_ref().is_some_and(|h| h.len() == 64)));
}
