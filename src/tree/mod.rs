pub mod browser;
pub mod filter;
pub mod marks;
pub mod node;

pub use browser::FolderBrowser;
pub use filter::{Visibility, filter_by_ids, search};
pub use marks::{MarkChange, recompute_marks};
pub use node::{DisplayMark, NodeId, NodeKind, SyncState, TreeNode, WorkspaceTree};
