//! Post-processors applied to finished trees

use crate::association::{FIXME_TAG, TODO_TAG};
use crate::model::{NodeKind, StructuralNode};

/// A tree-to-tree transform run after association
///
/// Processors may replace field values but must keep the tree's shape.
pub trait Processor: Send + Sync {
    /// Name reported when the processor fails
    fn name(&self) -> &str;

    /// Transform a finished tree
    ///
    /// # Errors
    /// Returns a short message when the tree cannot be processed; the
    /// file is then reported as failed.
    fn process(&self, root: StructuralNode) -> Result<StructuralNode, String>;
}

/// Rolls subtree counts up into the root's metrics
///
/// Keeps structural totals visible when output is flattened to one
/// record per file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryMetrics;

impl SummaryMetrics {
    pub const NAME: &'static str = "summary_metrics";
}

impl Processor for SummaryMetrics {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, mut root: StructuralNode) -> Result<StructuralNode, String> {
        let count = |kind: NodeKind| root.nodes_of_kind(kind).len() as u64;
        let counts = [
            ("functions", count(NodeKind::Function)),
            ("classes", count(NodeKind::Class)),
            ("imports", count(NodeKind::Import)),
            ("headings", count(NodeKind::Heading)),
            ("code_blocks", count(NodeKind::CodeBlock)),
        ];

        let tags = root.all_tags();
        let todos = tags.iter().filter(|tag| **tag == TODO_TAG).count() as u64;
        let fixmes = tags.iter().filter(|tag| **tag == FIXME_TAG).count() as u64;
        let comments = root.all_comments().len() as u64;

        for (key, value) in counts {
            root.metrics.insert(key.to_string(), value);
        }
        root.metrics.insert("comments".to_string(), comments);
        root.metrics.insert("todos".to_string(), todos);
        root.metrics.insert("fixmes".to_string(), fixmes);
        Ok(root)
    }
}
