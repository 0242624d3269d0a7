#![allow(clippy::expect_used)]


use std::fs;
use std::path::Path;

use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create dirs");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Two parseable files and one that fails to parse
fn scratch_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "pkg/core.py", "class Core:\n    pass\n");
    write(temp_dir.path(), "README.md", "# Title\n");
    write(temp_dir.path(), "pkg/broken.py", "def broken(:\n");
    temp_dir
}
