//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! debounce_ms = 300              # Quiet window before a rebuild starts
//! cooldown_ms = 800              # Minimum gap between two rebuilds
//! extra = ["postcss.config.js"]  # More files or directories that trigger a rebuild
//! ```
//!
//! The source tree, the base stylesheet's directory, `routecss.toml` and the
//! theme module (`paths.tool_config`) are always watched.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub debounce_ms: u64,
    pub cooldown_ms: u64,
    pub extra: Vec<PathBuf>,
}

pub struct WatchFields {
    pub debounce_ms: FieldPath,
    pub extra: FieldPath,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            cooldown_ms: 800,
            extra: Vec::new(),
        }
    }
}

impl WatchConfig {
    pub const FIELDS: WatchFields = WatchFields {
        debounce_ms: FieldPath::new("watch.debounce_ms"),
        extra: FieldPath::new("watch.extra"),
    };

    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub const fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn normalize(&mut self, root: &Path) {
        for path in &mut self.extra {
            *path = crate::utils::path::normalize_path(&root.join(&*path));
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms < 50 {
            diag.warn(
                Self::FIELDS.debounce_ms,
                "debounce below 50ms, editors that save in several steps will trigger extra rebuilds",
            );
        }
        for path in &self.extra {
            if !path.exists() {
                diag.warn(
                    Self::FIELDS.extra,
                    format!("{} does not exist yet, watched once it appears", path.display()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_watch_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.watch.debounce(), Duration::from_millis(300));
        assert_eq!(config.watch.cooldown(), Duration::from_millis(800));
        assert!(config.watch.extra.is_empty());
    }

    #[test]
    fn test_watch_override() {
        let config = test_parse_config("[watch]\ndebounce_ms = 150\nextra = [\"postcss.config.js\"]");
        assert_eq!(config.watch.debounce_ms, 150);
        assert_eq!(config.watch.extra, vec![PathBuf::from("postcss.config.js")]);
    }

    #[test]
    fn test_low_debounce_warns() {
        let watch = WatchConfig {
            debounce_ms: 10,
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        watch.validate(&mut diag);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().count(), 1);
    }
}
