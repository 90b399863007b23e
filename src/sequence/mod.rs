pub mod editor;
pub mod pool;

pub use editor::{DragState, DropOutcome, SlideSequence, move_to_gap};
pub use pool::{Slide, SlidePool};
