//! Sync-status payloads.
//!
//! Deployments answer the status endpoint in one of two shapes: a map from
//! leaf id to a status word, or lists of id references grouped by state.
//! While nothing is in flight the legacy service replies with `[]`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STATUS_CREATING: &str = "creating";
pub const STATUS_UPDATING: &str = "updating";

/// `{"id": "..."}` entry of the grouped shape. Other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SyncStatusPayload {
    /// `{"created": [...], "modified": [...], "synced": [...]}`
    Grouped {
        created: Vec<IdRef>,
        modified: Vec<IdRef>,
        #[serde(default)]
        synced: Vec<IdRef>,
    },
    /// `{"<leaf id>": "creating" | "updating"}`; absent leaves are synced
    ByLeaf(BTreeMap<String, String>),
    /// `[]`: no sync running, every leaf is synced
    Idle([(); 0]),
}

impl Default for SyncStatusPayload {
    fn default() -> Self {
        SyncStatusPayload::ByLeaf(BTreeMap::new())
    }
}
