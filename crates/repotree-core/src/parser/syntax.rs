//! Tree-sitter helpers shared by the code parsers

use std::ops::ControlFlow;

use tree_sitter::{Language as Grammar, Node, Tree};

use super::ParseError;

/// Parse `source` with a grammar, rejecting trees that contain errors
pub(crate) fn parse_tree(grammar: &Grammar, source: &str) -> Result<Tree, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(grammar)
        .map_err(|err| ParseError::Grammar(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Grammar("parser produced no tree".to_string()))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(first_error(root));
    }
    Ok(tree)
}

fn first_error(root: Node<'_>) -> ParseError {
    let mut found = None;
    preorder(root, |node| {
        if node.is_error() || node.is_missing() {
            found = Some(node);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    match found {
        Some(node) if node.is_missing() => ParseError::Syntax {
            line: start_line(node),
            message: format!("missing {}", node.kind()),
        },
        Some(node) => ParseError::Syntax {
            line: start_line(node),
            message: "invalid syntax".to_string(),
        },
        None => ParseError::Syntax {
            line: start_line(root),
            message: "invalid syntax".to_string(),
        },
    }
}

/// Visit `root` and every descendant in document order
pub(crate) fn preorder<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>) -> ControlFlow<()>) {
    let mut cursor = root.walk();
    loop {
        if visit(cursor.node()).is_break() {
            return;
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Every descendant of `root` with the given kind, in document order
pub(crate) fn nodes_of_kind<'t>(root: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut nodes = Vec::new();
    preorder(root, |node| {
        if node.kind() == kind {
            nodes.push(node);
        }
        ControlFlow::Continue(())
    });
    nodes
}

pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

pub(crate) fn start_line(node: Node<'_>) -> u32 {
    to_line(node.start_position().row)
}

/// Last line a node occupies
///
/// A node that ends at column 0 stops on the previous line.
pub(crate) fn end_line(node: Node<'_>) -> u32 {
    let end = node.end_position();
    if end.column == 0 && end.row > node.start_position().row {
        to_line(end.row - 1)
    } else {
        to_line(end.row)
    }
}

fn to_line(row: usize) -> u32 {
    u32::try_from(row + 1).unwrap_or(u32::MAX)
}
