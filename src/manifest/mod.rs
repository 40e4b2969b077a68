//! Route manifest: which classes each route needs.
//!
//! The manifest is the single source of truth for a build. It is written by
//! `analyze`, reused by every later `build` until `rebuild` deletes it, and
//! re-written on every change in watch mode.
//!
//! ```json
//! {
//!   "generated": "2024-06-15T14:30:45Z",
//!   "utilityTableVersion": 1,
//!   "pages": {
//!     "index": {
//!       "route": "index",
//!       "sourceFilePath": "src/index.njk",
//!       "relativePath": "index.njk",
//!       "pageSpecificClasses": ["hero", "text-xl"],
//!       "classes": ["hero", "text-xl", "container", "flex"],
//!       "totalClasses": 4,
//!       "estimatedSizeKB": 2.3
//!     }
//!   }
//! }
//! ```

mod store;

pub use store::{ManifestError, ManifestStore, load_or_analyze};

use crate::analyze::patterns::UTILITY_TABLE_VERSION;
use crate::utils::date::DateTimeUtc;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One route's class requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteManifestEntry {
    pub route: String,
    /// Originating page, relative to the project root.
    pub source_file_path: PathBuf,
    /// Originating page, relative to the source directory.
    pub relative_path: PathBuf,
    /// Classes extracted from the page alone.
    pub page_specific_classes: IndexSet<String>,
    /// Page classes plus every include's classes.
    pub classes: IndexSet<String>,
    pub total_classes: usize,
    #[serde(rename = "estimatedSizeKB")]
    pub estimated_size_kb: f64,
}

/// Persisted route manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// RFC 3339 creation time.
    pub generated: String,
    /// Utility table revision used to classify classes (0 when unknown).
    #[serde(default)]
    pub utility_table_version: u32,
    /// Routes in discovery order.
    pub pages: IndexMap<String, RouteManifestEntry>,
}

impl Manifest {
    /// Stamp `pages` with the current time and table version.
    pub fn new(pages: IndexMap<String, RouteManifestEntry>) -> Self {
        Self {
            generated: DateTimeUtc::now().to_rfc3339(),
            utility_table_version: UTILITY_TABLE_VERSION,
            pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Creation time, if `generated` is a valid timestamp.
    pub fn generated_at(&self) -> Option<DateTimeUtc> {
        DateTimeUtc::parse(&self.generated)
    }

    /// Whether classes were classified with the current utility table.
    pub fn is_current(&self) -> bool {
        self.utility_table_version == UTILITY_TABLE_VERSION
    }
}
