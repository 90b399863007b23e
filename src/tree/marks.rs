//! Folder mark propagation.
//!
//! A folder's own `marked` flag is set by the user; its `display_mark` is
//! derived from that flag and the flags below it. Toggling a folder cascades
//! the new value to every nested folder. Nothing here performs I/O: the
//! caller receives the ids whose flag changed and persists them itself.

use super::node::{DisplayMark, NodeId, NodeKind, TreeNode, WorkspaceTree};

/// Result of toggling one folder's mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkChange {
    /// The folder the user toggled
    pub folder: NodeId,
    /// New flag value, applied to the whole subtree
    pub value: bool,
    /// Folders whose flag actually changed, in pre-order
    pub changed: Vec<NodeId>,
}

impl MarkChange {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Recomputes display marks below and including `node`.
///
/// Returns whether the subtree carries a mark, i.e. whether an ancestor
/// should show `HasMarkedDescendant`. Leaves report `false` and are left
/// untouched.
pub fn recompute_marks(node: &mut TreeNode) -> bool {
    let NodeKind::Folder {
        marked,
        display_mark,
        children,
    } = &mut node.kind
    else {
        return false;
    };

    if *marked {
        // Children still need their own display state for when the user
        // descends into them.
        for child in children.iter_mut() {
            recompute_marks(child);
        }
        *display_mark = DisplayMark::Marked;
        return true;
    }

    let mut any_marked = false;
    for child in children.iter_mut() {
        // No short-circuit: every sibling must be refreshed
        any_marked |= recompute_marks(child);
    }

    *display_mark = if any_marked {
        DisplayMark::HasMarkedDescendant
    } else {
        DisplayMark::None
    };
    any_marked
}

/// Assigns `value` to `node` and every descendant folder, collecting the
/// ids of folders whose flag changed.
pub fn set_mark_recursive(node: &mut TreeNode, value: bool, changed: &mut Vec<NodeId>) {
    let NodeKind::Folder {
        marked, children, ..
    } = &mut node.kind
    else {
        return;
    };

    if *marked != value {
        *marked = value;
        changed.push(node.id.clone());
    }

    for child in children.iter_mut() {
        set_mark_recursive(child, value, changed);
    }
}

impl WorkspaceTree {
    /// Flips the mark of folder `id` and cascades the new value down.
    ///
    /// Display marks are recomputed from every root afterwards, since
    /// ancestors may move between `HasMarkedDescendant` and `None`. Returns
    /// `None` for leaves and unknown ids.
    pub fn toggle_mark(&mut self, id: &NodeId) -> Option<MarkChange> {
        let node = self.find_mut(id)?;
        let value = !node.marked()?;

        let mut changed = Vec::new();
        set_mark_recursive(node, value, &mut changed);
        self.recompute_marks();

        Some(MarkChange {
            folder: id.clone(),
            value,
            changed,
        })
    }
}
