//! Wire models for the presentation-asset API.
//!
//! These types mirror the JSON shapes returned by the remote service. They
//! carry no behavior; the `deckhand` crate converts them into its own tree
//! and status types.

pub mod slide;
pub mod status;
pub mod tree;

pub use slide::SlideModel;
pub use status::{IdRef, STATUS_CREATING, STATUS_UPDATING, SyncStatusPayload};
pub use tree::{FOLDER_TYPE, RawNode, TreePayload};
