//! Flat output records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FlattenMode;
use crate::model::{Comment, Dependency, NodeKind, PipelineResult, StructuralNode};

/// One serialized node: its own fields plus file-level metadata
///
/// Children are dropped; each record stands alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub kind: NodeKind,
    pub name: Option<String>,
    pub language: String,
    pub start_line: u32,
    pub end_line: u32,
    pub docstring: Option<String>,
    pub comments: Vec<Comment>,
    pub tags: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub parent_id: Option<String>,
    pub metrics: BTreeMap<String, u64>,
    pub path: String,
    pub lang: String,
    pub size: u64,
    pub sha256: Option<String>,
}

impl NodeRecord {
    /// Build a record for `node`, taking file metadata from `result`
    #[must_use]
    pub fn from_node(node: &StructuralNode, result: &PipelineResult) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind,
            name: node.name.clone(),
            language: node.language.clone(),
            start_line: node.start_line,
            end_line: node.end_line,
            docstring: node.docstring.clone(),
            comments: node.comments.clone(),
            tags: node.tags.clone(),
            dependencies: node.dependencies.clone(),
            parent_id: node.parent_id.clone(),
            metrics: node.metrics.clone(),
            path: result.path.to_string_lossy().into_owned(),
            lang: result.language.clone(),
            size: result.file_info.size,
            sha256: result.file_info.sha256.clone(),
        }
    }
}

/// Records for one result: every node in pre-order, or the root alone
///
/// Failed results produce no records.
#[must_use]
pub fn flatten(result: &PipelineResult, mode: FlattenMode) -> Vec<NodeRecord> {
    let Some(root) = result.root() else {
        return Vec::new();
    };
    match mode {
        FlattenMode::Node => root
            .walk()
            .map(|node| NodeRecord::from_node(node, result))
            .collect(),
        FlattenMode::File => vec![NodeRecord::from_node(root, result)],
    }
}
