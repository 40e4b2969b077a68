//! Command-line interface module.
//!
//! | Command   | Handler           |
//! |-----------|-------------------|
//! | `analyze` | [`analyze::run`]  |
//! | `build`   | [`build::run`]    |
//! | `watch`   | `crate::watch`    |
//! | `clean`   | [`clean::run`]    |
//! | `rebuild` | [`build::rebuild`]|
//! | `verify`  | [`verify::run`]   |

mod args;
pub mod analyze;
pub mod build;
pub mod clean;
pub mod verify;

pub use args::{Cli, Commands, VerifyTarget};
