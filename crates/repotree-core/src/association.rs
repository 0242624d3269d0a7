//! Comment association: attaches comments to their smallest enclosing node
//!
//! Runs once per parsed file, after the tree is complete. `comments` and
//! `tags` on every node are owned by this pass: both are rebuilt from the
//! flat comment list on each run, so running it twice is harmless.

use tracing::debug;

use crate::model::{Comment, StructuralNode};

/// Tag for pending-work markers
pub const TODO_TAG: &str = "TODO";
/// Tag for known-defect markers
pub const FIXME_TAG: &str = "FIXME";

/// Child-index path from `root` to the smallest node containing `line`
///
/// At each level the first child whose range contains the line wins.
/// An empty path means the root itself, including when no node contains
/// the line at all.
#[must_use]
pub fn owner_path(root: &StructuralNode, line: u32) -> Vec<usize> {
    let mut path = Vec::new();
    if !root.contains_line(line) {
        return path;
    }

    let mut node = root;
    while let Some((index, child)) = node
        .children
        .iter()
        .enumerate()
        .find(|(_, child)| child.contains_line(line))
    {
        path.push(index);
        node = child;
    }
    path
}

/// Smallest node containing `line`, falling back to `root`
#[must_use]
pub fn find_owner(root: &StructuralNode, line: u32) -> &StructuralNode {
    owner_path(root, line)
        .into_iter()
        .fold(root, |node, index| &node.children[index])
}

/// Marker tags found in a comment, each at most once, in a fixed order
#[must_use]
pub fn tags_for(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    [TODO_TAG, FIXME_TAG]
        .into_iter()
        .filter(|tag| lower.contains(&tag.to_lowercase()))
        .collect()
}

/// Attach every comment to its owner and derive tags
///
/// Existing comments and tags anywhere in the tree are discarded first.
pub fn associate(root: &mut StructuralNode, comments: &[Comment]) {
    clear(root);

    for comment in comments {
        let path = owner_path(root, comment.line);
        let owner = root.descendant_mut(&path);
        owner.comments.push(comment.clone());
        owner
            .tags
            .extend(tags_for(&comment.text).into_iter().map(str::to_string));
    }

    debug!("Associated {} comments in {}", comments.len(), root.path);
}

fn clear(node: &mut StructuralNode) {
    node.comments.clear();
    node.tags.clear();
    for child in &mut node.children {
        clear(child);
    }
}
