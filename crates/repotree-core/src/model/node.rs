//! Structural node types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of structural node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Module,
    Class,
    Function,
    Import,
    Heading,
    CodeBlock,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Module => "Module",
            Self::Class => "Class",
            Self::Function => "Function",
            Self::Import => "Import",
            Self::Heading => "Heading",
            Self::CodeBlock => "CodeBlock",
        };
        write!(f, "{s}")
    }
}

/// A comment extracted from source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Line of the comment opener (1-indexed)
    pub line: u32,
    /// Comment text without delimiters
    pub text: String,
}

impl Comment {
    #[must_use]
    pub fn new(line: u32, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }
}

/// Kind of dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Code import
    Import,
    /// Document hyperlink
    Link,
}

/// An outgoing reference: an import for code, a link for documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Imported name or link text
    pub name: String,
    /// Module the name comes from, or link URL
    pub target: Option<String>,
    pub kind: DependencyKind,
}

impl Dependency {
    /// Create an import dependency
    #[must_use]
    pub fn import(name: impl Into<String>, target: Option<String>) -> Self {
        Self {
            name: name.into(),
            target,
            kind: DependencyKind::Import,
        }
    }

    /// Create a hyperlink dependency
    #[must_use]
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: text.into(),
            target: Some(url.into()),
            kind: DependencyKind::Link,
        }
    }
}

/// One unit of extracted structure
///
/// `children` is the only ownership edge of the tree. `parent_id` is a plain
/// identifier for lookups and never owns anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralNode {
    /// Process-unique identifier
    pub id: String,
    pub kind: NodeKind,
    /// Human label; `None` for anonymous nodes such as code fences
    pub name: Option<String>,
    /// Tag of the parser that produced this subtree
    pub language: String,
    /// Source file path, identical across a subtree
    pub path: String,
    /// Start line (1-indexed, inclusive)
    pub start_line: u32,
    /// End line (1-indexed, inclusive)
    pub end_line: u32,
    /// Leading documentation string, when the language has one
    pub docstring: Option<String>,
    pub comments: Vec<Comment>,
    /// Markers derived from comment text
    pub tags: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub parent_id: Option<String>,
    /// Ordered by `start_line`
    pub children: Vec<StructuralNode>,
    pub metrics: BTreeMap<String, u64>,
}

impl StructuralNode {
    /// Create a detached node with a fresh identifier
    ///
    /// `end_line` is raised to `start_line` when it would otherwise be smaller.
    #[must_use]
    pub fn new(
        kind: NodeKind,
        name: Option<String>,
        language: impl Into<String>,
        path: impl Into<String>,
        start_line: u32,
        end_line: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            name,
            language: language.into(),
            path: path.into(),
            start_line,
            end_line: end_line.max(start_line),
            docstring: None,
            comments: Vec::new(),
            tags: Vec::new(),
            dependencies: Vec::new(),
            parent_id: None,
            children: Vec::new(),
            metrics: BTreeMap::new(),
        }
    }

    /// Create a node that inherits this node's language and path
    ///
    /// The range is clamped into this node's range so the result can be
    /// added as a child without breaking containment.
    #[must_use]
    pub fn child_node(
        &self,
        kind: NodeKind,
        name: Option<String>,
        start_line: u32,
        end_line: u32,
    ) -> Self {
        let start = start_line.clamp(self.start_line, self.end_line);
        let end = end_line.clamp(start, self.end_line);
        let mut node = Self::new(kind, name, self.language.clone(), self.path.clone(), start, end);
        node.parent_id = Some(self.id.clone());
        node
    }

    /// Set the docstring
    #[must_use]
    pub fn with_docstring(mut self, docstring: Option<String>) -> Self {
        self.docstring = docstring;
        self
    }

    /// Set a metric
    #[must_use]
    pub fn with_metric(mut self, key: impl Into<String>, value: u64) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }

    /// Attach a child, keeping children ordered by start line
    ///
    /// Children with equal start lines keep insertion order.
    pub fn add_child(&mut self, mut child: StructuralNode) {
        child.parent_id = Some(self.id.clone());
        let position = self
            .children
            .partition_point(|existing| existing.start_line <= child.start_line);
        self.children.insert(position, child);
    }

    /// Whether `line` falls inside this node's range
    #[must_use]
    pub const fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// Pre-order traversal of this node and all descendants
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including this one
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Find a node in this subtree by id
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&StructuralNode> {
        self.walk().find(|node| node.id == id)
    }

    /// Follow a path of child indices; stops at the deepest valid index
    pub fn descendant_mut(&mut self, path: &[usize]) -> &mut StructuralNode {
        let mut node = self;
        for &index in path {
            if index >= node.children.len() {
                break;
            }
            node = &mut node.children[index];
        }
        node
    }

    /// All nodes of a given kind in pre-order
    #[must_use]
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&StructuralNode> {
        self.walk().filter(|node| node.kind == kind).collect()
    }

    /// Every comment attached anywhere in this subtree
    #[must_use]
    pub fn all_comments(&self) -> Vec<&Comment> {
        self.walk().flat_map(|node| node.comments.iter()).collect()
    }

    /// Every tag attached anywhere in this subtree
    #[must_use]
    pub fn all_tags(&self) -> Vec<&str> {
        self.walk()
            .flat_map(|node| node.tags.iter().map(String::as_str))
            .collect()
    }

    /// Every docstring present in this subtree
    #[must_use]
    pub fn all_docstrings(&self) -> Vec<&str> {
        self.walk()
            .filter_map(|node| node.docstring.as_deref())
            .collect()
    }

    /// First `(parent_id, child_id)` pair that breaks the containment or
    /// ordering invariant, if any
    #[must_use]
    pub fn containment_violation(&self) -> Option<(&str, &str)> {
        for node in self.walk() {
            if node.start_line > node.end_line {
                return Some((node.parent_id.as_deref().unwrap_or(""), node.id.as_str()));
            }
            let mut previous_start = node.start_line;
            for child in &node.children {
                let inside = node.start_line <= child.start_line && child.end_line <= node.end_line;
                if !inside || child.start_line < previous_start {
                    return Some((node.id.as_str(), child.id.as_str()));
                }
                previous_start = child.start_line;
            }
        }
        None
    }
}

/// Pre-order iterator over a node tree
pub struct Walk<'a> {
    stack: Vec<&'a StructuralNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a StructuralNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
