//! Sync-status polling.
//!
//! While a bulk refresh is outstanding the service processes presentations
//! in the background. The reconciler polls the status endpoint on a fixed
//! interval and writes the result onto the live tree, as long as that tree
//! is still the generation the poller was started for.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::status::StatusMap;
use super::workspace::{Generation, SharedWorkspace};
use super::writes::WriteWatch;
use crate::api::WorkspaceApi;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilerState {
    Idle,
    Polling { generation: Generation },
}

/// Why a poller stopped on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// No write was outstanding after the last tick
    Settled { ticks: u32 },
    /// The tree was replaced; the poller stopped without touching it
    Superseded { ticks: u32 },
}

#[derive(Debug)]
struct Poller {
    generation: Generation,
    handle: JoinHandle<PollExit>,
}

pub struct SyncReconciler<A: WorkspaceApi> {
    api: Arc<A>,
    workspace: SharedWorkspace,
    interval: Duration,
    poller: Option<Poller>,
}

impl<A: WorkspaceApi> SyncReconciler<A> {
    pub fn new(api: Arc<A>, workspace: SharedWorkspace) -> Self {
        Self::with_interval(api, workspace, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(api: Arc<A>, workspace: SharedWorkspace, interval: Duration) -> Self {
        Self {
            api,
            workspace,
            interval,
            poller: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> ReconcilerState {
        match &self.poller {
            Some(poller) if !poller.handle.is_finished() => ReconcilerState::Polling {
                generation: poller.generation,
            },
            _ => ReconcilerState::Idle,
        }
    }

    /// Starts polling against the workspace's current generation.
    ///
    /// Any previous poller is stopped first. The first fetch happens right
    /// away; later ones follow every interval until `writes` reports no
    /// outstanding refresh. Must be called inside a tokio runtime.
    pub fn start(&mut self, writes: WriteWatch) -> Generation {
        self.reset();

        let generation = self.workspace.generation();
        info!(
            generation = %generation,
            interval_ms = self.interval.as_millis() as u64,
            "Sync polling started"
        );

        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.api),
            self.workspace.clone(),
            generation,
            writes,
            self.interval,
        ));
        self.poller = Some(Poller { generation, handle });
        generation
    }

    /// Stops the current poller, if any. Called before a new tree fetch so
    /// nothing keeps polling on behalf of the discarded tree.
    pub fn reset(&mut self) {
        if let Some(poller) = self.poller.take()
            && !poller.handle.is_finished()
        {
            debug!(generation = %poller.generation, "Stopping sync poller");
            poller.handle.abort();
        }
    }

    /// Waits for the current poller to stop on its own.
    ///
    /// Returns `None` if no poller was started or it was aborted.
    pub async fn join(&mut self) -> Option<PollExit> {
        let poller = self.poller.take()?;
        match poller.handle.await {
            Ok(exit) => Some(exit),
            Err(e) => {
                if !e.is_cancelled() {
                    warn!(error = %e, "Sync poller task failed");
                }
                None
            }
        }
    }
}

impl<A: WorkspaceApi> Drop for SyncReconciler<A> {
    fn drop(&mut self) {
        self.reset();
    }
}

async fn poll_loop<A: WorkspaceApi>(
    api: Arc<A>,
    workspace: SharedWorkspace,
    generation: Generation,
    writes: WriteWatch,
    interval: Duration,
) -> PollExit {
    let mut ticks = 0;
    loop {
        if !workspace.lock().is_current(generation) {
            debug!(generation = %generation, ticks, "Tree replaced, poller exiting");
            return PollExit::Superseded { ticks };
        }

        ticks += 1;
        let pending_at_fetch = writes.is_pending();
        if !fetch_and_apply(api.as_ref(), &workspace, generation, ticks).await {
            return PollExit::Superseded { ticks };
        }

        if !writes.is_pending() {
            if pending_at_fetch {
                // The refresh finished while that fetch was in flight, so its
                // answer may predate completion
                debug!(generation = %generation, ticks, "Reading final sync status");
                if !fetch_and_apply(api.as_ref(), &workspace, generation, ticks).await {
                    return PollExit::Superseded { ticks };
                }
            }
            info!(generation = %generation, ticks, "Sync settled, polling stopped");
            return PollExit::Settled { ticks };
        }

        tokio::time::sleep(interval).await;
    }
}

/// One status fetch applied to `generation`. Returns `false` once the tree
/// has been replaced; a failed fetch keeps the last known state.
async fn fetch_and_apply<A: WorkspaceApi>(
    api: &A,
    workspace: &SharedWorkspace,
    generation: Generation,
    tick: u32,
) -> bool {
    let payload = match api.fetch_sync_status().await {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, tick, "Sync status fetch failed");
            return true;
        }
    };

    let statuses = StatusMap::from(payload);
    let applied = workspace.lock().apply_status(generation, &statuses);
    match applied {
        Some(changed) => {
            debug!(
                generation = %generation,
                tick,
                pending = statuses.pending_count(),
                changed = changed.len(),
                "Applied sync status"
            );
            true
        }
        None => {
            debug!(generation = %generation, tick, "Dropping status for replaced tree");
            false
        }
    }
}
