//! Folder/presentation tree as delivered by the tree endpoint.

use serde::{Deserialize, Serialize};

/// Value of the `type` field that marks a folder. Anything else is a leaf
/// (`"pres"` in the legacy API, `"presentation"` in the newer one).
pub const FOLDER_TYPE: &str = "folder";

/// A node of the remote tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    /// Stored mark flag, only meaningful on folders
    #[serde(default)]
    pub mark: bool,
    #[serde(default)]
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub fn is_folder(&self) -> bool {
        self.node_type == FOLDER_TYPE
    }
}

/// The tree endpoint returns either one root folder or a list of roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreePayload {
    Forest(Vec<RawNode>),
    Single(RawNode),
}

impl TreePayload {
    pub fn into_roots(self) -> Vec<RawNode> {
        match self {
            TreePayload::Forest(roots) => roots,
            TreePayload::Single(root) => vec![root],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_root_with_extra_fields() {
        let json = r#"{
            "id": "root",
            "name": "My Drive",
            "type": "folder",
            "mark": true,
            "children": [
                {"id": "p1", "name": "Deck", "type": "presentation",
                 "modifiedTime": "2023-01-01T00:00:00Z", "parents": ["root"]}
            ]
        }"#;

        let payload: TreePayload = serde_json::from_str(json).unwrap();
        let roots = payload.into_roots();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].is_folder());
        assert!(roots[0].mark);
        assert_eq!(roots[0].children[0].node_type, "presentation");
        assert!(roots[0].children[0].children.is_empty());
    }

    #[test]
    fn test_forest_without_marks() {
        let json = r#"[
            {"id": "a", "name": "A", "type": "folder", "children": []},
            {"id": "b", "name": "B", "type": "pres"}
        ]"#;

        let roots = serde_json::from_str::<TreePayload>(json).unwrap().into_roots();
        assert_eq!(roots.len(), 2);
        assert!(!roots[0].mark);
        assert!(!roots[1].is_folder());
    }
}
