#![allow(clippy::expect_used)]

mod tests_processor;

use std::fs;
use std::path::{Path, PathBuf};

/// Write a file under `root`, returning its path
fn write(root: &Path, name: &str, content: &str) -> PathBuf {
    let path = root.join(name);
    fs::write(&path, content).expect("Failed to write file");
    path
}
