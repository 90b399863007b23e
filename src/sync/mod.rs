pub mod reconciler;
pub mod status;
pub mod workspace;
pub mod writes;

pub use reconciler::{DEFAULT_POLL_INTERVAL, PollExit, ReconcilerState, SyncReconciler};
pub use status::StatusMap;
pub use workspace::{Generation, SharedWorkspace, Workspace};
pub use writes::{PendingWrite, WriteTracker, WriteWatch};
