use deckhand_wire::{STATUS_CREATING, STATUS_UPDATING, SyncStatusPayload};
use std::collections::HashMap;
use tracing::debug;

use crate::tree::{NodeId, NodeKind, SyncState, TreeNode, WorkspaceTree};

/// Sync state per leaf id, normalized from either payload shape.
///
/// Leaves missing from the map are treated as synced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMap {
    states: HashMap<NodeId, SyncState>,
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, state: SyncState) {
        self.states.insert(NodeId::new(id), state);
    }

    pub fn state_of(&self, id: &NodeId) -> SyncState {
        self.states.get(id).copied().unwrap_or_default()
    }

    /// Number of leaves still being processed remotely.
    pub fn pending_count(&self) -> usize {
        self.states
            .values()
            .filter(|state| !state.is_settled())
            .count()
    }
}

fn parse_status_word(word: &str) -> SyncState {
    match word {
        STATUS_CREATING => SyncState::Creating,
        STATUS_UPDATING => SyncState::Updating,
        _ => SyncState::Synced,
    }
}

impl From<SyncStatusPayload> for StatusMap {
    fn from(payload: SyncStatusPayload) -> Self {
        let mut map = StatusMap::new();
        match payload {
            SyncStatusPayload::Idle(_) => {}
            SyncStatusPayload::ByLeaf(entries) => {
                for (id, word) in entries {
                    let state = parse_status_word(&word);
                    if state.is_settled() && word != "synced" {
                        debug!(id = %id, status = %word, "Unknown sync status, treating as synced");
                    }
                    map.insert(id, state);
                }
            }
            SyncStatusPayload::Grouped {
                created,
                modified,
                synced,
            } => {
                // Later groups win if the server lists an id twice
                for entry in synced {
                    map.insert(entry.id, SyncState::Synced);
                }
                for entry in created {
                    map.insert(entry.id, SyncState::Creating);
                }
                for entry in modified {
                    map.insert(entry.id, SyncState::Updating);
                }
            }
        }
        map
    }
}

impl WorkspaceTree {
    /// Writes the sync state of every leaf from `statuses`.
    ///
    /// Returns the ids of leaves whose state changed, so only those need
    /// to be redrawn.
    pub fn apply_status(&mut self, statuses: &StatusMap) -> Vec<NodeId> {
        fn walk(node: &mut TreeNode, statuses: &StatusMap, changed: &mut Vec<NodeId>) {
            match &mut node.kind {
                NodeKind::Leaf { sync_state } => {
                    let next = statuses.state_of(&node.id);
                    if *sync_state != next {
                        *sync_state = next;
                        changed.push(node.id.clone());
                    }
                }
                NodeKind::Folder { children, .. } => {
                    for child in children.iter_mut() {
                        walk(child, statuses, changed);
                    }
                }
            }
        }

        let mut changed = Vec::new();
        for root in &mut self.roots {
            walk(root, statuses, &mut changed);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckhand_wire::IdRef;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn tree() -> WorkspaceTree {
        WorkspaceTree::new(vec![TreeNode::folder(
            "root",
            "Drive",
            false,
            vec![
                TreeNode::leaf("a", "A"),
                TreeNode::folder("f", "F", false, vec![TreeNode::leaf("b", "B")]),
                TreeNode::leaf("c", "C"),
            ],
        )])
    }

    fn state(tree: &WorkspaceTree, id: &str) -> SyncState {
        tree.find(&id.into()).and_then(TreeNode::sync_state).unwrap()
    }

    #[test]
    fn test_by_leaf_payload() {
        let mut entries = BTreeMap::new();
        entries.insert("a".to_string(), "creating".to_string());
        entries.insert("b".to_string(), "updating".to_string());
        entries.insert("c".to_string(), "weird".to_string());

        let map = StatusMap::from(SyncStatusPayload::ByLeaf(entries));
        assert_eq!(map.state_of(&"a".into()), SyncState::Creating);
        assert_eq!(map.state_of(&"b".into()), SyncState::Updating);
        assert_eq!(map.state_of(&"c".into()), SyncState::Synced);
        assert_eq!(map.state_of(&"absent".into()), SyncState::Synced);
        assert_eq!(map.pending_count(), 2);
    }

    #[test]
    fn test_grouped_payload() {
        let payload = SyncStatusPayload::Grouped {
            created: vec![IdRef { id: "a".to_string() }],
            modified: vec![IdRef { id: "b".to_string() }],
            synced: vec![IdRef { id: "c".to_string() }],
        };

        let map = StatusMap::from(payload);
        assert_eq!(map.state_of(&"a".into()), SyncState::Creating);
        assert_eq!(map.state_of(&"b".into()), SyncState::Updating);
        assert_eq!(map.state_of(&"c".into()), SyncState::Synced);
    }

    #[test]
    fn test_idle_payload_settles_every_leaf() {
        let mut tree = tree();
        let mut map = StatusMap::new();
        map.insert("a", SyncState::Creating);
        tree.apply_status(&map);

        let payload: SyncStatusPayload = serde_json::from_str("[]").unwrap();
        let idle = StatusMap::from(payload);
        assert_eq!(idle, StatusMap::new());
        assert_eq!(tree.apply_status(&idle), vec![NodeId::from("a")]);
        assert!(!tree.is_locked(&"a".into()));
    }

    #[test]
    fn test_apply_status_reports_changed_leaves() {
        let mut tree = tree();
        let mut map = StatusMap::new();
        map.insert("a", SyncState::Creating);
        map.insert("b", SyncState::Updating);

        let changed = tree.apply_status(&map);
        assert_eq!(changed, vec![NodeId::from("a"), NodeId::from("b")]);
        assert_eq!(state(&tree, "a"), SyncState::Creating);
        assert_eq!(state(&tree, "b"), SyncState::Updating);
        assert_eq!(state(&tree, "c"), SyncState::Synced);

        // Same mapping again changes nothing
        assert!(tree.apply_status(&map).is_empty());
    }

    #[test]
    fn test_absent_leaf_falls_back_to_synced() {
        let mut tree = tree();
        let mut map = StatusMap::new();
        map.insert("a", SyncState::Updating);
        tree.apply_status(&map);

        let changed = tree.apply_status(&StatusMap::new());
        assert_eq!(changed, vec![NodeId::from("a")]);
        assert_eq!(state(&tree, "a"), SyncState::Synced);
    }

    #[test]
    fn test_apply_status_leaves_marks_alone() {
        let mut tree = WorkspaceTree::new(vec![TreeNode::folder(
            "root",
            "Drive",
            true,
            vec![TreeNode::leaf("a", "A")],
        )]);
        let before = tree.roots[0].display_mark();
        let mut map = StatusMap::new();
        map.insert("root", SyncState::Updating);
        assert!(tree.apply_status(&map).is_empty());
        assert_eq!(tree.roots[0].display_mark(), before);
    }
}
