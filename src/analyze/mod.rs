//! Template analysis.
//!
//! | Module     | Role                                               |
//! |------------|----------------------------------------------------|
//! | `patterns` | utility-class shapes (search and classification)   |
//! | `extract`  | class extraction from one template                 |
//! | `route`    | page path to route name                            |
//! | `scan`     | project walk, shared classes, manifest assembly    |
//! | `summary`  | analysis report and class listing                  |

pub mod extract;
pub mod patterns;
pub mod route;
pub mod scan;
pub mod summary;

pub use scan::{ScanOutcome, analyze};
