//! Shared utilities.
//!
//! | Module   | Purpose                                          |
//! |----------|--------------------------------------------------|
//! | `date`   | UTC timestamps for manifests and reports         |
//! | `exec`   | External command execution with timeouts         |
//! | `html`   | HTML escaping for probe documents                |
//! | `path`   | Path normalization                               |
//! | `plural` | Count formatting for log lines                   |

pub mod date;
pub mod exec;
pub mod html;
pub mod path;
pub mod plural;
