pub mod api;
pub mod config;
pub mod sequence;
pub mod session;
pub mod sync;
pub mod tree;
pub mod utils;
