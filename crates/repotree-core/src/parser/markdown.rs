//! Markdown parser: headings, fenced code blocks, links and HTML comments

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::text::line_at;
use super::{read_source, ParseError, ParsedFile, Parser, ParserInput};
use crate::model::{Comment, Dependency, NodeKind};
use crate::scanner::Language;

#[allow(clippy::expect_used)]
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(#{1,6})\s+(.*?)\s*$").expect("valid heading regex"));

#[allow(clippy::expect_used)]
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}```").expect("valid fence regex"));

#[allow(clippy::expect_used)]
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));

#[allow(clippy::expect_used)]
static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").expect("valid comment regex"));

/// Builds a flat outline of headings and code fences under the root
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownParser;

impl MarkdownParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Parser for MarkdownParser {
    fn language(&self) -> Language {
        Language::Markdown
    }

    fn parse(&self, input: &ParserInput) -> Result<ParsedFile, ParseError> {
        let source = read_source(&input.path)?;
        let mut root = input.module_root(Language::Markdown, &source);

        let blocks = fenced_blocks(&source);
        for &(start, end) in &blocks {
            let block = root.child_node(NodeKind::CodeBlock, None, start, end);
            root.add_child(block);
        }

        for (index, line) in source.lines().enumerate() {
            let line_no = u32::try_from(index + 1).unwrap_or(u32::MAX);
            if blocks.iter().any(|&(start, end)| start <= line_no && line_no <= end) {
                continue;
            }
            let Some(caps) = HEADING.captures(line) else {
                continue;
            };
            let level = caps[1].len() as u64;
            let title = strip_closing_hashes(&caps[2]);
            let heading = root
                .child_node(NodeKind::Heading, Some(title.to_string()), line_no, line_no)
                .with_metric("level", level);
            root.add_child(heading);
        }

        root.dependencies = LINK
            .captures_iter(&source)
            .map(|caps| Dependency::link(&caps[1], &caps[2]))
            .collect();

        let comments: Vec<Comment> = HTML_COMMENT
            .captures_iter(&source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(Comment::new(line_at(&source, whole.start()), caps[1].trim()))
            })
            .collect();

        debug!(
            "Parsed {}: {} headings, {} code blocks, {} links",
            input.path.display(),
            root.nodes_of_kind(NodeKind::Heading).len(),
            blocks.len(),
            root.dependencies.len()
        );
        Ok(ParsedFile { root, comments })
    }
}

/// Line ranges of fenced code blocks
///
/// Fence markers pair up in order; a trailing unmatched fence is dropped.
fn fenced_blocks(source: &str) -> Vec<(u32, u32)> {
    let fences: Vec<u32> = source
        .lines()
        .enumerate()
        .filter(|(_, line)| FENCE.is_match(line))
        .map(|(index, _)| u32::try_from(index + 1).unwrap_or(u32::MAX))
        .collect();

    fences
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

/// Drop an optional closing `#` sequence from an ATX heading title
fn strip_closing_hashes(title: &str) -> &str {
    let stripped = title.trim_end_matches('#');
    if stripped.len() == title.len() {
        return title;
    }
    if stripped.is_empty() || stripped.ends_with(char::is_whitespace) {
        stripped.trim_end()
    } else {
        title
    }
}
