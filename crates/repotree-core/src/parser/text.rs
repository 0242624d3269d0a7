//! Line counting and docstring helpers shared by all parsers

use std::collections::BTreeMap;

#[must_use]
pub fn count_blank_lines(text: &str) -> u64 {
    text.lines().filter(|line| line.trim().is_empty()).count() as u64
}

/// Number of non-blank lines
#[must_use]
pub fn count_code_lines(text: &str) -> u64 {
    text.lines().filter(|line| !line.trim().is_empty()).count() as u64
}

/// Number of physical lines, never less than one
#[must_use]
pub fn physical_line_count(text: &str) -> u32 {
    u32::try_from(text.lines().count()).unwrap_or(u32::MAX).max(1)
}

/// `blank_lines` and `lines_of_code` for a whole file
#[must_use]
pub fn base_metrics(text: &str) -> BTreeMap<String, u64> {
    BTreeMap::from([
        ("blank_lines".to_string(), count_blank_lines(text)),
        ("lines_of_code".to_string(), count_code_lines(text)),
    ])
}

/// 1-indexed line of a byte offset
pub(crate) fn line_at(text: &str, offset: usize) -> u32 {
    let newlines = text.as_bytes()[..offset.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    u32::try_from(newlines + 1).unwrap_or(u32::MAX)
}

/// Normalize docstring indentation
///
/// Leading whitespace of the first line is dropped, the common indent of
/// the remaining lines is removed, and blank lines at either end are
/// trimmed. Returns `None` when nothing is left.
#[must_use]
pub fn clean_docstring(raw: &str) -> Option<String> {
    let expanded = raw.replace('\t', "        ");
    let mut lines: Vec<&str> = expanded.lines().collect();
    if lines.is_empty() {
        return None;
    }

    let indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_spaces(line))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    cleaned.push(lines.remove(0).trim().to_string());
    for line in lines {
        let cut = indent.min(leading_spaces(line));
        cleaned.push(line[cut..].trim_end().to_string());
    }

    while cleaned.first().is_some_and(String::is_empty) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(String::is_empty) {
        cleaned.pop();
    }

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join("\n"))
    }
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}
