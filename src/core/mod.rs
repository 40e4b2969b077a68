//! Core types - pure abstractions shared across the codebase.

mod mode;
mod state;

pub use mode::BuildMode;
pub use state::{is_shutdown, setup_shutdown_handler};
