//! `[tool]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [tool]
//! # Tried in order with `--help`; the first that answers is used for every route.
//! candidates = [
//!     ["npx", "tailwindcss"],
//!     ["./node_modules/.bin/tailwindcss"],
//!     ["node", "./node_modules/tailwindcss/lib/cli.js"],
//!     ["tailwindcss"],
//! ]
//! probe_timeout = 5          # Seconds allowed for each `--help` probe
//! timeout = 30               # Seconds allowed for one route build
//! timeout_v4 = 45            # Same, when the detected CLI is v4
//! production_env = "NODE_ENV" # `NODE_ENV=production` enables `--minify`
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Candidate invocations, each a program followed by its leading arguments.
    pub candidates: Vec<Vec<String>>,
    /// Seconds allowed for each availability probe.
    pub probe_timeout: u64,
    /// Seconds allowed for one route build.
    pub timeout: u64,
    /// Seconds allowed for one route build with a v4 CLI.
    pub timeout_v4: u64,
    /// Environment variable whose value `production` selects production mode.
    pub production_env: String,
}

pub struct ToolFields {
    pub candidates: FieldPath,
    pub probe_timeout: FieldPath,
    pub timeout: FieldPath,
    pub timeout_v4: FieldPath,
    pub production_env: FieldPath,
}

impl Default for ToolConfig {
    fn default() -> Self {
        let candidate = |parts: &[&str]| parts.iter().map(|s| (*s).to_string()).collect();
        Self {
            candidates: vec![
                candidate(&["npx", "tailwindcss"]),
                candidate(&["./node_modules/.bin/tailwindcss"]),
                candidate(&["node", "./node_modules/tailwindcss/lib/cli.js"]),
                candidate(&["tailwindcss"]),
            ],
            probe_timeout: 5,
            timeout: 30,
            timeout_v4: 45,
            production_env: "NODE_ENV".into(),
        }
    }
}

impl ToolConfig {
    pub const FIELDS: ToolFields = ToolFields {
        candidates: FieldPath::new("tool.candidates"),
        probe_timeout: FieldPath::new("tool.probe_timeout"),
        timeout: FieldPath::new("tool.timeout"),
        timeout_v4: FieldPath::new("tool.timeout_v4"),
        production_env: FieldPath::new("tool.production_env"),
    };

    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout)
    }

    pub const fn build_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub const fn build_timeout_v4(&self) -> Duration {
        Duration::from_secs(self.timeout_v4)
    }

    /// Validate tool configuration.
    ///
    /// # Checks
    /// - `candidates` must not be empty, nor contain an empty invocation
    /// - every timeout must be positive
    /// - `production_env` must not be empty
    /// - hint when no candidate program can be located (library fallback will be used)
    pub fn validate(&self, root: &Path, diag: &mut ConfigDiagnostics) {
        if self.candidates.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.candidates,
                format!("{} is empty", Self::FIELDS.candidates),
                "remove the key to use the default candidates",
            );
        } else if self.candidates.iter().any(Vec::is_empty) {
            diag.error(
                Self::FIELDS.candidates,
                format!("{} contains an empty invocation", Self::FIELDS.candidates),
            );
        } else if !self.candidates.iter().any(|c| Self::is_locatable(&c[0], root)) {
            diag.hint(
                Self::FIELDS.candidates,
                "no candidate found on PATH, routes will fall back to the in-process pipeline",
            );
        }

        for (field, secs) in [
            (Self::FIELDS.probe_timeout, self.probe_timeout),
            (Self::FIELDS.timeout, self.timeout),
            (Self::FIELDS.timeout_v4, self.timeout_v4),
        ] {
            if secs == 0 {
                diag.error(field, format!("{field} must be at least 1 second"));
            }
        }

        if self.production_env.trim().is_empty() {
            diag.error(
                Self::FIELDS.production_env,
                format!("{} must name an environment variable", Self::FIELDS.production_env),
            );
        }
    }

    /// Whether `program` resolves to an executable (relative paths from `root`).
    ///
    /// Package runners like `npx` count as found even though the package they
    /// run is only resolved by the probe.
    fn is_locatable(program: &str, root: &Path) -> bool {
        which::which_in(program, std::env::var_os("PATH"), root).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_tool_defaults() {
        let config = test_parse_config("");
        let tool = &config.tool;

        assert_eq!(tool.candidates.len(), 4);
        assert_eq!(tool.candidates[0], vec!["npx", "tailwindcss"]);
        assert_eq!(tool.candidates[3], vec!["tailwindcss"]);
        assert_eq!(tool.probe_timeout(), Duration::from_secs(5));
        assert_eq!(tool.build_timeout(), Duration::from_secs(30));
        assert_eq!(tool.build_timeout_v4(), Duration::from_secs(45));
        assert_eq!(tool.production_env, "NODE_ENV");
    }

    #[test]
    fn test_tool_custom_candidates() {
        let config = test_parse_config(
            "[tool]\ncandidates = [[\"bunx\", \"tailwindcss\"]]\ntimeout = 60",
        );

        assert_eq!(config.tool.candidates, vec![vec!["bunx", "tailwindcss"]]);
        assert_eq!(config.tool.build_timeout(), Duration::from_secs(60));
        // untouched
        assert_eq!(config.tool.probe_timeout, 5);
    }

    #[test]
    fn test_validate_empty_candidates() {
        let tool = ToolConfig {
            candidates: vec![],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        tool.validate(Path::new("."), &mut diag);
        assert!(diag.errors().any(|e| e.field == ToolConfig::FIELDS.candidates));
    }

    #[test]
    fn test_validate_empty_invocation() {
        let tool = ToolConfig {
            candidates: vec![vec!["tailwindcss".into()], vec![]],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        tool.validate(Path::new("."), &mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let tool = ToolConfig {
            timeout: 0,
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        tool.validate(Path::new("."), &mut diag);
        assert!(diag.errors().any(|e| e.field == ToolConfig::FIELDS.timeout));
    }

    #[test]
    fn test_unlocatable_candidates_are_not_errors() {
        let tool = ToolConfig {
            candidates: vec![vec!["routecss-missing-tool".into()]],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        tool.validate(Path::new("."), &mut diag);
        assert!(!diag.has_errors());
    }
}
