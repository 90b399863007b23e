//! Ties the live workspace to the remote service.
//!
//! A reload discards the displayed tree, fetches a new one, installs it if
//! nothing superseded the fetch, requests a bulk sync and polls until that
//! sync completes. Mark toggles are applied locally first and persisted
//! afterwards.

use anyhow::{Context, Result};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::WorkspaceApi;
use crate::sync::{SharedWorkspace, SyncReconciler, WriteTracker, WriteWatch};
use crate::tree::{MarkChange, NodeId, WorkspaceTree};

pub struct WorkspaceSession<A: WorkspaceApi> {
    api: Arc<A>,
    workspace: SharedWorkspace,
    reconciler: SyncReconciler<A>,
    writes: WriteTracker,
}

impl<A: WorkspaceApi> WorkspaceSession<A> {
    pub fn new(api: Arc<A>, poll_interval: Duration) -> Self {
        let workspace = SharedWorkspace::new();
        let reconciler =
            SyncReconciler::with_interval(Arc::clone(&api), workspace.clone(), poll_interval);
        Self {
            api,
            workspace,
            reconciler,
            writes: WriteTracker::new(),
        }
    }

    pub fn workspace(&self) -> &SharedWorkspace {
        &self.workspace
    }

    pub fn reconciler(&self) -> &SyncReconciler<A> {
        &self.reconciler
    }

    pub fn reconciler_mut(&mut self) -> &mut SyncReconciler<A> {
        &mut self.reconciler
    }

    pub fn writes(&self) -> WriteWatch {
        self.writes.watch()
    }

    /// Replaces the displayed tree with a fresh fetch, without syncing.
    ///
    /// Returns `Ok(false)` if another reload overtook this one while the
    /// fetch was in flight. On a failed fetch the tree stays empty.
    pub async fn load(&mut self) -> Result<bool> {
        self.reconciler.reset();
        let generation = self.workspace.lock().begin_reload();

        let payload = self
            .api
            .fetch_tree()
            .await
            .context("Workspace reload failed")?;
        let tree = WorkspaceTree::from(payload);
        let leaves = tree.leaves().len();

        if !self.workspace.lock().install(generation, tree) {
            return Ok(false);
        }
        info!(generation = %generation, leaves, "Workspace tree installed");
        Ok(true)
    }

    /// Loads a fresh tree, then requests a bulk sync and polls its status
    /// until the sync completes.
    pub async fn refresh(&mut self) -> Result<bool> {
        if !self.load().await? {
            return Ok(false);
        }

        let write = self.writes.begin();
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            match api.request_sync().await {
                Ok(()) => debug!("Bulk sync finished"),
                Err(e) => warn!(error = %e, "Bulk sync request failed"),
            }
            write.complete();
        });

        self.reconciler.start(self.writes.watch());
        Ok(true)
    }

    /// Toggles a folder's mark and persists the changed folders in the
    /// background.
    ///
    /// Returns `None` for leaves, unknown ids or before the first tree is
    /// installed.
    pub fn toggle_mark(&self, id: &NodeId) -> Option<MarkChange> {
        let change = self.workspace.lock().toggle_mark(id)?;
        if !change.is_empty() {
            let api = Arc::clone(&self.api);
            let pending = change.clone();
            tokio::spawn(async move {
                persist_changes(api.as_ref(), &pending).await;
            });
        }
        Some(change)
    }

    /// Stores every changed folder of `change`. Returns the number of
    /// failed writes; failures are logged and not retried.
    pub async fn persist_marks(&self, change: &MarkChange) -> usize {
        persist_changes(self.api.as_ref(), change).await
    }
}

async fn persist_changes<A: WorkspaceApi>(api: &A, change: &MarkChange) -> usize {
    let results = join_all(
        change
            .changed
            .iter()
            .map(|id| async move { (id, api.persist_mark(id, change.value).await) }),
    )
    .await;

    let mut failures = 0;
    for (id, result) in results {
        if let Err(e) = result {
            warn!(folder_id = %id, value = change.value, error = %e, "Failed to persist mark");
            failures += 1;
        }
    }
    debug!(
        folder_id = %change.folder,
        changed = change.changed.len(),
        failures,
        "Mark persistence finished"
    );
    failures
}
