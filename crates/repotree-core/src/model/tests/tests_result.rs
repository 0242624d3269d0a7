//! Tests for pipeline results and file metadata

#![allow(clippy::expect_used)]

use std::fs;

use tempfile::TempDir;

use crate::model::{FileError, FileInfo, NodeKind, PipelineResult, StructuralNode};

#[test]
fn test_success_result_exposes_root_only() {
    let root = StructuralNode::new(NodeKind::Module, None, "python", "a.py", 1, 1);
    let result = PipelineResult::success("a.py", "python", FileInfo::default(), root);

    assert!(result.is_success());
    assert!(result.root().is_some());
    assert!(result.error().is_none());
}

#[test]
fn test_failure_result_exposes_error_only() {
    let result =
        PipelineResult::failure("a.txt", "txt", FileInfo::default(), FileError::NoParser);

    assert!(!result.is_success());
    assert!(result.root().is_none());
    assert_eq!(result.error(), Some(&FileError::NoParser));
}

#[test]
fn test_no_parser_message_is_distinguished() {
    assert_eq!(FileError::NoParser.to_string(), "no parser");
    assert_eq!(FileError::NoParser.kind(), "no_parser");
}

#[test]
fn test_file_error_kinds() {
    assert_eq!(FileError::Io("gone".to_string()).kind(), "io");
    assert_eq!(FileError::Parse("bad".to_string()).kind(), "parse");
    let processor = FileError::Processor {
        name: "summary".to_string(),
        message: "boom".to_string(),
    };
    assert_eq!(processor.kind(), "processor");
    assert_eq!(processor.to_string(), "processor summary failed: boom");
}

#[test]
fn test_file_info_from_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("a.py");
    fs::write(&path, "x = 1\n").expect("Failed to write file");

    let info = FileInfo::from_path(&path).expect("Failed to read file info");
    assert_eq!(info.size, 6);
    let hash = info.sha256.expect("hash expected");
    assert_eq!(hash.len(), 64);
}

#[test]
fn test_file_info_from_missing_path_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    assert!(FileInfo::from_path(&temp_dir.path().join("missing.py")).is_err());
}
