//! Remote collaborators of the workspace core.
//!
//! [`WorkspaceApi`] is the seam between the core and the HTTP service; the
//! session and the reconciler only talk to it, so tests substitute an
//! in-memory implementation.

pub mod http;

use anyhow::Result;
use deckhand_wire::{SyncStatusPayload, TreePayload};
use std::future::Future;

use crate::tree::NodeId;

pub use http::HttpApi;

pub trait WorkspaceApi: Send + Sync + 'static {
    /// Fetches the whole folder/presentation tree.
    fn fetch_tree(&self) -> impl Future<Output = Result<TreePayload>> + Send;

    /// Fetches the current per-leaf sync status.
    fn fetch_sync_status(&self) -> impl Future<Output = Result<SyncStatusPayload>> + Send;

    /// Stores one folder's mark flag.
    fn persist_mark(
        &self,
        folder_id: &NodeId,
        value: bool,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Asks the service to resync the tree with the cloud drive. Resolves
    /// when the service reports the refresh finished.
    fn request_sync(&self) -> impl Future<Output = Result<()>> + Send;
}
