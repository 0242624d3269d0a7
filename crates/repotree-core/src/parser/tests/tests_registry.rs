//! Tests for the parser registry

use std::path::Path;
use std::sync::Arc;

use crate::parser::{MarkdownParser, ParserRegistry};
use crate::scanner::Language;

#[test]
fn test_defaults_cover_builtin_extensions() {
    let registry = ParserRegistry::with_defaults();
    assert_eq!(
        registry.extensions(),
        vec!["cjs", "js", "jsx", "markdown", "md", "mjs", "py"]
    );
    assert_eq!(registry.len(), 7);
}

#[test]
fn test_lookup_is_case_insensitive() {
    let registry = ParserRegistry::with_defaults();
    let parser = registry.get("PY").expect("python parser");
    assert_eq!(parser.language(), Language::Python);
    assert!(registry.get(".md").is_some());
    assert!(registry.get("txt").is_none());
}

#[test]
fn test_for_path() {
    let registry = ParserRegistry::with_defaults();
    assert_eq!(
        registry
            .for_path(Path::new("docs/README.md"))
            .map(|p| p.language()),
        Some(Language::Markdown)
    );
    assert!(registry.for_path(Path::new("Makefile")).is_none());
}

#[test]
fn test_register_replaces_existing() {
    let mut registry = ParserRegistry::new();
    assert!(registry.is_empty());

    assert!(registry.register("txt", Arc::new(MarkdownParser::new())).is_none());
    let replaced = registry.register("TXT", Arc::new(MarkdownParser::new()));
    assert!(replaced.is_some());
    assert_eq!(registry.entries(), vec![("txt", Language::Markdown)]);
}
