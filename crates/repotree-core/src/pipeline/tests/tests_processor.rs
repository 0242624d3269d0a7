//! Tests for built-in processors

use crate::association::associate;
use crate::model::{Comment, NodeKind, StructuralNode};
use crate::pipeline::{Processor, SummaryMetrics};

#[test]
fn test_summary_metrics_counts_subtree() {
    let mut root = StructuralNode::new(NodeKind::Module, None, "python", "a.py", 1, 30);
    let mut class = root.child_node(NodeKind::Class, Some("A".to_string()), 2, 20);
    let method = class.child_node(NodeKind::Function, Some("m".to_string()), 3, 10);
    class.add_child(method);
    root.add_child(class);
    let import = root.child_node(NodeKind::Import, None, 1, 1);
    root.add_child(import);
    associate(
        &mut root,
        &[
            Comment::new(4, "TODO: a"),
            Comment::new(12, "fixme and todo"),
            Comment::new(25, "plain"),
        ],
    );

    let root = SummaryMetrics.process(root).expect("process");

    assert_eq!(root.metrics["functions"], 1);
    assert_eq!(root.metrics["classes"], 1);
    assert_eq!(root.metrics["imports"], 1);
    assert_eq!(root.metrics["headings"], 0);
    assert_eq!(root.metrics["code_blocks"], 0);
    assert_eq!(root.metrics["comments"], 3);
    assert_eq!(root.metrics["todos"], 2);
    assert_eq!(root.metrics["fixmes"], 1);
    assert_eq!(SummaryMetrics.name(), "summary_metrics");
}

#[test]
fn test_summary_metrics_keeps_structure() {
    let mut root = StructuralNode::new(NodeKind::Module, None, "markdown", "a.md", 1, 5);
    let heading = root.child_node(NodeKind::Heading, Some("T".to_string()), 1, 1);
    root.add_child(heading);
    let before = root.clone();

    let after = SummaryMetrics.process(root).expect("process");

    assert_eq!(after.children, before.children);
    assert_eq!(after.id, before.id);
    assert_eq!(after.metrics["headings"], 1);
}
