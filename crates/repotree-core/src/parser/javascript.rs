//! JavaScript parser built on tree-sitter-javascript

use tree_sitter::Node;
use tracing::debug;

use super::syntax::{end_line, node_text, nodes_of_kind, parse_tree, start_line};
use super::text::clean_docstring;
use super::{read_source, ParseError, ParsedFile, Parser, ParserInput};
use crate::model::{Comment, Dependency, NodeKind, StructuralNode};
use crate::scanner::Language;

/// Extracts ES imports, `require` calls, classes, functions and comments
///
/// A `/** ... */` block directly above a declaration becomes its docstring.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptParser;

impl JavaScriptParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Parser for JavaScriptParser {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn parse(&self, input: &ParserInput) -> Result<ParsedFile, ParseError> {
        let source = read_source(&input.path)?;
        let tree = parse_tree(&tree_sitter_javascript::LANGUAGE.into(), &source)?;
        let program = tree.root_node();

        let mut root = input.module_root(Language::JavaScript, &source);
        visit(program, &source, &mut root);

        let comments: Vec<Comment> = nodes_of_kind(program, "comment")
            .into_iter()
            .map(|node| Comment::new(start_line(node), comment_text(node_text(node, &source))))
            .collect();

        debug!(
            "Parsed {}: {} nodes, {} comments",
            input.path.display(),
            root.node_count(),
            comments.len()
        );
        Ok(ParsedFile { root, comments })
    }
}

fn visit(node: Node<'_>, source: &str, parent: &mut StructuralNode) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_statement" => {
                let import = import_node(child, source, parent);
                parent.add_child(import);
            }
            "class_declaration" => {
                let name = field_text(child, "name", source);
                let class = definition(child, NodeKind::Class, name, child, source, parent);
                push_with_children(parent, class, child, source);
            }
            "function_declaration" | "generator_function_declaration" | "method_definition" => {
                let name = field_text(child, "name", source);
                let function = definition(child, NodeKind::Function, name, child, source, parent);
                push_with_children(parent, function, child, source);
            }
            "variable_declarator" => visit_declarator(child, source, parent),
            "export_statement" => visit_export(child, source, parent),
            "field_definition" => visit_field(child, source, parent),
            _ => visit(child, source, parent),
        }
    }
}

fn is_function_value(value: Node<'_>) -> bool {
    matches!(
        value.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

/// `export default function () {}` and `export default class {}`
///
/// Anonymous defaults are named `default`.
fn visit_export(export: Node<'_>, source: &str, parent: &mut StructuralNode) {
    let Some(value) = export.child_by_field_name("value") else {
        return visit(export, source, parent);
    };
    let kind = match value.kind() {
        "class" => NodeKind::Class,
        _ if is_function_value(value) => NodeKind::Function,
        _ => return visit(export, source, parent),
    };
    let name = field_text(value, "name", source).unwrap_or_else(|| "default".to_string());
    let node = definition(value, kind, Some(name), export, source, parent);
    push_with_children(parent, node, value, source);
}

/// Class fields holding a function, e.g. `handle = () => {}`
fn visit_field(field: Node<'_>, source: &str, parent: &mut StructuralNode) {
    match field.child_by_field_name("value") {
        Some(value) if is_function_value(value) => {
            let name = field_text(field, "property", source);
            let function = definition(field, NodeKind::Function, name, field, source, parent);
            push_with_children(parent, function, value, source);
        }
        _ => visit(field, source, parent),
    }
}

fn push_with_children(
    parent: &mut StructuralNode,
    mut node: StructuralNode,
    syntax: Node<'_>,
    source: &str,
) {
    visit(syntax, source, &mut node);
    parent.add_child(node);
}

/// `const f = () => {}`, `let g = function () {}` and `const x = require("m")`
fn visit_declarator(declarator: Node<'_>, source: &str, parent: &mut StructuralNode) {
    let Some(value) = declarator.child_by_field_name("value") else {
        return visit(declarator, source, parent);
    };

    match value.kind() {
        _ if is_function_value(value) => {
            // JSDoc sits above the whole declaration, not the declarator
            let anchor = declarator.parent().unwrap_or(declarator);
            let name = field_text(declarator, "name", source);
            let function = definition(declarator, NodeKind::Function, name, anchor, source, parent);
            push_with_children(parent, function, value, source);
        }
        "call_expression" => match require_import(declarator, value, source, parent) {
            Some(import) => parent.add_child(import),
            None => visit(declarator, source, parent),
        },
        _ => visit(declarator, source, parent),
    }
}

fn require_import(
    declarator: Node<'_>,
    call: Node<'_>,
    source: &str,
    parent: &StructuralNode,
) -> Option<StructuralNode> {
    let target = require_target(call, source)?;
    let name = declarator
        .child_by_field_name("name")
        .filter(|name| name.kind() == "identifier")
        .map_or_else(|| target.clone(), |name| node_text(name, source).to_string());

    let mut import = parent.child_node(
        NodeKind::Import,
        Some(target.clone()),
        start_line(declarator),
        end_line(declarator),
    );
    import.dependencies.push(Dependency::import(name, Some(target)));
    Some(import)
}

/// Module specifier of a `require("...")` call
fn require_target(call: Node<'_>, source: &str) -> Option<String> {
    let function = call.child_by_field_name("function")?;
    if node_text(function, source) != "require" {
        return None;
    }
    let arguments = call.child_by_field_name("arguments")?;
    let first = arguments.named_child(0)?;
    (first.kind() == "string").then(|| unquote(node_text(first, source)).to_string())
}

fn field_text(node: Node<'_>, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|n| node_text(n, source).to_string())
}

/// Node for a definition; `anchor` is where a JSDoc block is looked up
fn definition(
    syntax: Node<'_>,
    kind: NodeKind,
    name: Option<String>,
    anchor: Node<'_>,
    source: &str,
    parent: &StructuralNode,
) -> StructuralNode {
    parent
        .child_node(kind, name, start_line(syntax), end_line(syntax))
        .with_docstring(jsdoc(anchor, source))
}

fn import_node(node: Node<'_>, source: &str, parent: &StructuralNode) -> StructuralNode {
    let target = node
        .child_by_field_name("source")
        .map(|s| unquote(node_text(s, source)).to_string());

    let mut names = Vec::new();
    let mut cursor = node.walk();
    for clause in node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "import_clause")
    {
        collect_bindings(clause, source, &mut names);
    }
    if names.is_empty() {
        // Side-effect import
        names.extend(target.clone());
    }

    let mut import = parent.child_node(
        NodeKind::Import,
        target.clone(),
        start_line(node),
        end_line(node),
    );
    import.dependencies = names
        .into_iter()
        .map(|name| Dependency::import(name, target.clone()))
        .collect();
    import
}

/// Imported binding names of an import clause, without aliases
fn collect_bindings(clause: Node<'_>, source: &str, names: &mut Vec<String>) {
    let mut cursor = clause.walk();
    for binding in clause.named_children(&mut cursor) {
        match binding.kind() {
            "identifier" => names.push(node_text(binding, source).to_string()),
            "namespace_import" => names.push("*".to_string()),
            "named_imports" => {
                let mut inner = binding.walk();
                for specifier in binding
                    .named_children(&mut inner)
                    .filter(|s| s.kind() == "import_specifier")
                {
                    if let Some(name) = specifier.child_by_field_name("name") {
                        names.push(unquote(node_text(name, source)).to_string());
                    }
                }
            }
            _ => {}
        }
    }
}

/// `/** ... */` block ending on the line right above `anchor`
///
/// Exported declarations look above the `export` keyword.
fn jsdoc(anchor: Node<'_>, source: &str) -> Option<String> {
    let anchor = match anchor.parent() {
        Some(parent) if parent.kind() == "export_statement" => parent,
        _ => anchor,
    };
    let comment = anchor.prev_named_sibling()?;
    if comment.kind() != "comment" || end_line(comment) + 1 < start_line(anchor) {
        return None;
    }
    let raw = node_text(comment, source);
    if !raw.starts_with("/**") || raw.starts_with("/**/") {
        return None;
    }
    clean_docstring(&block_body(raw))
}

fn comment_text(raw: &str) -> String {
    if let Some(line) = raw.strip_prefix("//") {
        line.trim().to_string()
    } else {
        block_body(raw)
    }
}

/// Text of a block comment without delimiters or leading `*` gutters
fn block_body(raw: &str) -> String {
    let inner = raw
        .trim_start_matches("/*")
        .trim_start_matches('*')
        .trim_end_matches("*/");
    inner
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            trimmed
                .strip_prefix('*')
                .map_or(trimmed, |rest| rest.strip_prefix(' ').unwrap_or(rest))
                .trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn unquote(literal: &str) -> &str {
    literal.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}
