#![allow(clippy::expect_used)]

mod tests_registry;

use std::fs;

use tempfile::TempDir;

use crate::model::FileInfo;
use crate::parser::{ParseError, ParsedFile, Parser, ParserInput};

/// Write `content` to a scratch file and run `parser` on it
fn parse_source(
    parser: &dyn Parser,
    file_name: &str,
    content: &str,
) -> Result<ParsedFile, ParseError> {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(file_name);
    fs::write(&path, content).expect("Failed to write file");
    parser.parse(&ParserInput::new(path, FileInfo::default()))
}
