#![allow(clippy::expect_used)]


use crate::model::{Comment, FileError, FileInfo, NodeKind, PipelineResult, StructuralNode};

/// module(1-10) > class Widget(2-8) > function draw(3-5)
fn sample_result(path: &str) -> PipelineResult {
    let mut root = StructuralNode::new(
        NodeKind::Module,
        Some("widget".to_string()),
        "python",
        path,
        1,
        10,
    );
    let mut class = root.child_node(NodeKind::Class, Some("Widget".to_string()), 2, 8);
    let mut draw = class.child_node(NodeKind::Function, Some("draw".to_string()), 3, 5);
    draw.comments.push(Comment::new(4, "TODO: clip"));
    draw.tags.push("TODO".to_string());
    class.add_child(draw);
    root.add_child(class);

    let info = FileInfo {
        size: 120,
        sha256: Some("ab".repeat(32)),
    };
    PipelineResult::success(path, "python", info, root)
}

fn failed_result(path: &str) -> PipelineResult {
    PipelineResult::failure(
        path,
        "txt",
        FileInfo {
            size: 3,
            sha256: None,
        },
        FileError::NoParser,
    )
}
