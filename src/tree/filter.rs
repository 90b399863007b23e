//! Search and tag-filter visibility over the workspace tree.

use std::collections::HashSet;

use super::node::{NodeId, TreeNode, WorkspaceTree};

/// Set of node ids that stay visible after a search or filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    visible: HashSet<NodeId>,
}

impl Visibility {
    pub fn is_visible(&self, id: &NodeId) -> bool {
        self.visible.contains(id)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    fn show_subtree(&mut self, node: &TreeNode) {
        self.visible.insert(node.id.clone());
        for child in node.children() {
            self.show_subtree(child);
        }
    }
}

/// Name search: a matching node is shown with its whole subtree, and every
/// ancestor of a match stays visible so the match can be reached.
pub fn search(tree: &WorkspaceTree, phrase: &str) -> Visibility {
    fn walk(node: &TreeNode, phrase: &str, out: &mut Visibility) -> bool {
        if node.name.contains(phrase) {
            out.show_subtree(node);
            return true;
        }

        let mut any = false;
        for child in node.children() {
            any |= walk(child, phrase, out);
        }
        if any {
            out.visible.insert(node.id.clone());
        }
        any
    }

    let mut out = Visibility::default();
    for root in &tree.roots {
        walk(root, phrase, &mut out);
    }
    out
}

/// Keeps the leaves whose id is in `ids` (e.g. a tag query result) and the
/// folders leading to them.
pub fn filter_by_ids(tree: &WorkspaceTree, ids: &HashSet<NodeId>) -> Visibility {
    fn walk(node: &TreeNode, ids: &HashSet<NodeId>, out: &mut Visibility) -> bool {
        let visible = if node.is_folder() {
            let mut any = false;
            for child in node.children() {
                any |= walk(child, ids, out);
            }
            any
        } else {
            ids.contains(&node.id)
        };

        if visible {
            out.visible.insert(node.id.clone());
        }
        visible
    }

    let mut out = Visibility::default();
    for root in &tree.roots {
        walk(root, ids, &mut out);
    }
    out
}
