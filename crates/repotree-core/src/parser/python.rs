//! Python parser built on tree-sitter-python

use std::ops::ControlFlow;

use tree_sitter::Node;
use tracing::debug;

use super::syntax::{end_line, node_text, nodes_of_kind, parse_tree, preorder, start_line};
use super::text::clean_docstring;
use super::{read_source, ParseError, ParsedFile, Parser, ParserInput};
use crate::model::{Comment, Dependency, NodeKind, StructuralNode};
use crate::scanner::Language;

/// Extracts imports, classes, functions, docstrings and `#` comments
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonParser;

impl PythonParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Parser for PythonParser {
    fn language(&self) -> Language {
        Language::Python
    }

    fn parse(&self, input: &ParserInput) -> Result<ParsedFile, ParseError> {
        let source = read_source(&input.path)?;
        let tree = parse_tree(&tree_sitter_python::LANGUAGE.into(), &source)?;
        let module = tree.root_node();
        reject_legacy_syntax(module, &source)?;

        let mut root = input
            .module_root(Language::Python, &source)
            .with_docstring(block_docstring(module, &source));
        visit(module, &source, &mut root);

        let comments = nodes_of_kind(module, "comment")
            .into_iter()
            .map(|node| Comment::new(start_line(node), comment_text(node_text(node, &source))))
            .collect::<Vec<_>>();

        debug!(
            "Parsed {}: {} nodes, {} comments",
            input.path.display(),
            root.node_count(),
            comments.len()
        );
        Ok(ParsedFile { root, comments })
    }
}

/// Build nodes for recognized constructs under `node`
///
/// Recognized constructs become the parent for their own subtree.
/// Anything else is descended into with the current parent, so
/// definitions nested in loops or conditionals are still found.
fn visit(node: Node<'_>, source: &str, parent: &mut StructuralNode) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                let import = import_node(child, source, parent);
                parent.add_child(import);
            }
            "class_definition" => {
                let name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source).to_string());
                let mut class = parent
                    .child_node(NodeKind::Class, name, start_line(child), end_line(child))
                    .with_docstring(definition_docstring(child, source));
                visit(child, source, &mut class);
                parent.add_child(class);
            }
            "function_definition" => {
                let name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source).to_string());
                let mut function = parent
                    .child_node(NodeKind::Function, name, start_line(child), end_line(child))
                    .with_docstring(definition_docstring(child, source));
                if is_async(child) {
                    function.metrics.insert("is_async".to_string(), 1);
                }
                visit(child, source, &mut function);
                parent.add_child(function);
            }
            _ => visit(child, source, parent),
        }
    }
}

/// Reject Python 2 constructs the grammar still accepts
///
/// The earliest offending line is reported.
fn reject_legacy_syntax(module: Node<'_>, source: &str) -> Result<(), ParseError> {
    let mut found = None;
    preorder(module, |node| match legacy_construct(node, source) {
        Some(message) => {
            found = Some((start_line(node), message));
            ControlFlow::Break(())
        }
        None => ControlFlow::Continue(()),
    });
    let backtick = stray_backtick(module, source).map(|line| (line, "backtick repr"));

    match found.into_iter().chain(backtick).min_by_key(|(line, _)| *line) {
        Some((line, construct)) => Err(ParseError::Syntax {
            line,
            message: format!("{construct} is not valid in Python 3"),
        }),
        None => Ok(()),
    }
}

fn legacy_construct(node: Node<'_>, source: &str) -> Option<&'static str> {
    match node.kind() {
        "print_statement" => Some("print statement"),
        "exec_statement" => Some("exec statement"),
        "except_clause" if has_token(node, ",") => Some("comma in except clause"),
        "raise_statement" if has_child_kind(node, "expression_list") => {
            Some("raise with several expressions")
        }
        "comparison_operator" if has_token(node, "<>") => Some("<> operator"),
        "integer" if is_legacy_integer(node_text(node, source)) => Some("Python 2 integer literal"),
        _ => None,
    }
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}

fn has_child_kind(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).any(|child| child.kind() == kind);
    found
}

/// `10L`, `0x1fL` and zero-padded decimals such as `0777`
fn is_legacy_integer(literal: &str) -> bool {
    if literal.ends_with(['l', 'L']) {
        return true;
    }
    let digits = literal.replace('_', "");
    digits.len() > 1
        && digits.starts_with('0')
        && digits.chars().all(|c| c.is_ascii_digit())
        && digits.chars().any(|c| c != '0')
}

/// Line of the first backtick outside strings and comments
fn stray_backtick(module: Node<'_>, source: &str) -> Option<u32> {
    source.match_indices('`').find_map(|(offset, _)| {
        let node = module.descendant_for_byte_range(offset, offset + 1)?;
        let quoted = std::iter::successors(Some(node), Node::parent)
            .any(|n| matches!(n.kind(), "string" | "comment"));
        (!quoted).then(|| super::text::line_at(source, offset))
    })
}

fn is_async(function: Node<'_>) -> bool {
    function.child(0).is_some_and(|first| first.kind() == "async")
}

fn import_node(node: Node<'_>, source: &str, parent: &StructuralNode) -> StructuralNode {
    let module = match node.kind() {
        "import_from_statement" => node
            .child_by_field_name("module_name")
            .map(|m| node_text(m, source).to_string()),
        "future_import_statement" => Some("__future__".to_string()),
        _ => None,
    };

    let mut cursor = node.walk();
    let mut dependencies: Vec<Dependency> = node
        .children_by_field_name("name", &mut cursor)
        .map(|name| Dependency::import(imported_name(name, source), module.clone()))
        .collect();

    let mut cursor = node.walk();
    if node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "wildcard_import")
    {
        dependencies.push(Dependency::import("*", module.clone()));
    }

    let label = module.or_else(|| dependencies.first().map(|dep| dep.name.clone()));
    let mut import = parent.child_node(NodeKind::Import, label, start_line(node), end_line(node));
    import.dependencies = dependencies;
    import
}

/// Imported name without any `as` alias
fn imported_name(name: Node<'_>, source: &str) -> String {
    let target = if name.kind() == "aliased_import" {
        name.child_by_field_name("name").unwrap_or(name)
    } else {
        name
    };
    node_text(target, source).to_string()
}

fn definition_docstring(definition: Node<'_>, source: &str) -> Option<String> {
    let body = definition.child_by_field_name("body")?;
    block_docstring(body, source)
}

/// Docstring of a module or block: a string literal as its first statement
fn block_docstring(block: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = block.walk();
    let first = block
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let literal = first.named_child(0)?;
    if literal.kind() != "string" {
        return None;
    }
    clean_docstring(strip_string_quotes(node_text(literal, source)))
}

/// Remove string prefixes and matching quotes from a literal
fn strip_string_quotes(literal: &str) -> &str {
    let body = literal.trim_start_matches(|c: char| "rRuUbBfF".contains(c));
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(inner) = body
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    body
}

fn comment_text(raw: &str) -> String {
    raw.trim_start_matches(['#', ' ']).trim_end().to_string()
}
