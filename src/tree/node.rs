use deckhand_wire::{RawNode, TreePayload};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

use super::marks;

/// Stable identifier of a node, shared across snapshots of the same tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Derived three-state summary of a folder's mark, used for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMark {
    #[default]
    None,
    Marked,
    HasMarkedDescendant,
}

/// Remote processing state of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncState {
    #[default]
    Synced,
    Creating,
    Updating,
}

impl SyncState {
    pub fn is_settled(self) -> bool {
        self == SyncState::Synced
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncState::Synced => write!(f, "synced"),
            SyncState::Creating => write!(f, "creating"),
            SyncState::Updating => write!(f, "updating"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Folder {
        /// Own flag, set directly by the user
        marked: bool,
        display_mark: DisplayMark,
        children: Vec<TreeNode>,
    },
    Leaf {
        sync_state: SyncState,
    },
}

/// A folder or a presentation reference in the workspace tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
}

impl TreeNode {
    pub fn folder(
        id: impl Into<String>,
        name: impl Into<String>,
        marked: bool,
        children: Vec<TreeNode>,
    ) -> Self {
        Self {
            id: NodeId::new(id),
            name: name.into(),
            kind: NodeKind::Folder {
                marked,
                display_mark: DisplayMark::None,
                children,
            },
        }
    }

    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(id),
            name: name.into(),
            kind: NodeKind::Leaf {
                sync_state: SyncState::default(),
            },
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// Children in display order; always empty for a leaf.
    pub fn children(&self) -> &[TreeNode] {
        match &self.kind {
            NodeKind::Folder { children, .. } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut [TreeNode] {
        match &mut self.kind {
            NodeKind::Folder { children, .. } => children,
            NodeKind::Leaf { .. } => &mut [],
        }
    }

    pub fn marked(&self) -> Option<bool> {
        match self.kind {
            NodeKind::Folder { marked, .. } => Some(marked),
            NodeKind::Leaf { .. } => None,
        }
    }

    pub fn display_mark(&self) -> Option<DisplayMark> {
        match self.kind {
            NodeKind::Folder { display_mark, .. } => Some(display_mark),
            NodeKind::Leaf { .. } => None,
        }
    }

    pub fn sync_state(&self) -> Option<SyncState> {
        match self.kind {
            NodeKind::Leaf { sync_state } => Some(sync_state),
            NodeKind::Folder { .. } => None,
        }
    }

    fn find(&self, id: &NodeId) -> Option<&TreeNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    fn find_mut(&mut self, id: &NodeId) -> Option<&mut TreeNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children_mut()
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    fn path_to<'a>(&'a self, id: &NodeId, path: &mut Vec<&'a str>) -> bool {
        path.push(self.name.as_str());
        if &self.id == id || self.children().iter().any(|child| child.path_to(id, path)) {
            return true;
        }
        path.pop();
        false
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a TreeNode>) {
        match &self.kind {
            NodeKind::Leaf { .. } => out.push(self),
            NodeKind::Folder { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

impl From<RawNode> for TreeNode {
    fn from(raw: RawNode) -> Self {
        if raw.is_folder() {
            let children = raw.children.into_iter().map(TreeNode::from).collect();
            return TreeNode::folder(raw.id, raw.name, raw.mark, children);
        }

        if !raw.children.is_empty() {
            warn!(
                id = %raw.id,
                dropped = raw.children.len(),
                "Leaf node delivered with children, dropping them"
            );
        }
        TreeNode::leaf(raw.id, raw.name)
    }
}

/// One fetched snapshot of the workspace tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceTree {
    pub roots: Vec<TreeNode>,
}

impl WorkspaceTree {
    /// Builds a snapshot and computes every folder's display mark.
    pub fn new(roots: Vec<TreeNode>) -> Self {
        let mut tree = Self { roots };
        tree.warn_on_duplicate_ids();
        tree.recompute_marks();
        tree
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn find(&self, id: &NodeId) -> Option<&TreeNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut TreeNode> {
        self.roots.iter_mut().find_map(|root| root.find_mut(id))
    }

    /// Names from the root down to and including the node, for breadcrumbs.
    pub fn path_from_root(&self, id: &NodeId) -> Option<Vec<&str>> {
        let mut path = Vec::new();
        for root in &self.roots {
            if root.path_to(id, &mut path) {
                return Some(path);
            }
        }
        None
    }

    /// All leaves in depth-first, children order.
    pub fn leaves(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        for root in &self.roots {
            root.collect_leaves(&mut out);
        }
        out
    }

    /// A leaf still being processed remotely cannot be opened.
    pub fn is_locked(&self, id: &NodeId) -> bool {
        self.find(id)
            .and_then(TreeNode::sync_state)
            .is_some_and(|state| !state.is_settled())
    }

    pub fn recompute_marks(&mut self) {
        for root in &mut self.roots {
            marks::recompute_marks(root);
        }
    }

    fn warn_on_duplicate_ids(&self) {
        fn walk<'a>(node: &'a TreeNode, seen: &mut HashSet<&'a NodeId>) {
            if !seen.insert(&node.id) {
                warn!(id = %node.id, "Duplicate node id in tree snapshot");
            }
            for child in node.children() {
                walk(child, seen);
            }
        }

        let mut seen = HashSet::new();
        for root in &self.roots {
            walk(root, &mut seen);
        }
    }
}

impl From<TreePayload> for WorkspaceTree {
    fn from(payload: TreePayload) -> Self {
        let roots = payload
            .into_roots()
            .into_iter()
            .map(TreeNode::from)
            .collect();
        WorkspaceTree::new(roots)
    }
}
