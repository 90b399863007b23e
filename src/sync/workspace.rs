//! The live, currently displayed tree and its generation counter.
//!
//! Every reload bumps the generation and discards the old tree. Anything
//! that was started against an earlier generation (a tree fetch, a status
//! poll) must present that generation when it completes; results for a
//! superseded generation are dropped.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::status::StatusMap;
use crate::tree::{MarkChange, NodeId, WorkspaceTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct Workspace {
    generation: Generation,
    tree: Option<WorkspaceTree>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// The displayed tree; `None` until the first fetch of this generation
    /// is installed.
    pub fn tree(&self) -> Option<&WorkspaceTree> {
        self.tree.as_ref()
    }

    /// Discards the current tree and opens a new generation for the fetch
    /// that is about to start.
    pub fn begin_reload(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.tree = None;
        debug!(generation = %self.generation, "Workspace reload started");
        self.generation
    }

    /// Installs a fetched tree if its fetch belongs to the current
    /// generation.
    pub fn install(&mut self, generation: Generation, tree: WorkspaceTree) -> bool {
        if !self.is_current(generation) {
            debug!(
                fetched = %generation,
                current = %self.generation,
                "Dropping tree fetched for a superseded generation"
            );
            return false;
        }
        self.tree = Some(tree);
        true
    }

    /// Applies a status poll result. Returns `None` if the poll belongs to
    /// a superseded generation, otherwise the ids of leaves that changed.
    pub fn apply_status(
        &mut self,
        generation: Generation,
        statuses: &StatusMap,
    ) -> Option<Vec<NodeId>> {
        if !self.is_current(generation) {
            return None;
        }
        Some(
            self.tree
                .as_mut()
                .map(|tree| tree.apply_status(statuses))
                .unwrap_or_default(),
        )
    }

    pub fn toggle_mark(&mut self, id: &NodeId) -> Option<MarkChange> {
        self.tree.as_mut()?.toggle_mark(id)
    }
}

/// Handle to the live workspace shared between the owner and its poller.
///
/// The lock is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SharedWorkspace(Arc<Mutex<Workspace>>);

impl SharedWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, Workspace> {
        // A poisoned lock still holds a usable tree
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn generation(&self) -> Generation {
        self.lock().generation()
    }

    /// Clones the current tree out of the lock.
    pub fn snapshot(&self) -> Option<WorkspaceTree> {
        self.lock().tree().cloned()
    }
}
