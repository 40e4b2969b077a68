//! `[paths]` section configuration.
//!
//! All paths are relative to the project root (the directory holding
//! `routecss.toml`, or the working directory when there is none).
//!
//! # Example
//!
//! ```toml
//! [paths]
//! source = "src"                        # Template tree to scan
//! includes = "src/_includes"            # Shared partials (no route of their own)
//! data = "src/_data"                    # Excluded from scanning
//! extensions = ["njk", "html"]          # Template file extensions
//! stylesheet = "src/css/tailwind.css"   # Base stylesheet fed to the tool
//! tool_config = "tailwind.config.js"    # Project tool config; its theme is reused when present
//! output = "_site/css"                  # One `{route}.css` per page
//! scratch = ".temp-css"                 # Probe documents (deleted after each route)
//! manifest = "css-routes-config.json"   # Persisted route manifest
//! report = "css-build-report.json"      # Persisted build report
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub source: PathBuf,
    pub includes: PathBuf,
    pub data: PathBuf,
    pub extensions: Vec<String>,
    pub stylesheet: PathBuf,
    pub tool_config: PathBuf,
    pub output: PathBuf,
    pub scratch: PathBuf,
    pub manifest: PathBuf,
    pub report: PathBuf,
}

pub struct PathsFields {
    pub source: FieldPath,
    pub includes: FieldPath,
    pub data: FieldPath,
    pub extensions: FieldPath,
    pub output: FieldPath,
    pub scratch: FieldPath,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: "src".into(),
            includes: "src/_includes".into(),
            data: "src/_data".into(),
            extensions: vec!["njk".into(), "html".into()],
            stylesheet: "src/css/tailwind.css".into(),
            tool_config: "tailwind.config.js".into(),
            output: "_site/css".into(),
            scratch: ".temp-css".into(),
            manifest: "css-routes-config.json".into(),
            report: "css-build-report.json".into(),
        }
    }
}

impl PathsConfig {
    pub const FIELDS: PathsFields = PathsFields {
        source: FieldPath::new("paths.source"),
        includes: FieldPath::new("paths.includes"),
        data: FieldPath::new("paths.data"),
        extensions: FieldPath::new("paths.extensions"),
        output: FieldPath::new("paths.output"),
        scratch: FieldPath::new("paths.scratch"),
    };

    /// Resolve every path against the project root.
    pub fn normalize(&mut self, root: &Path) {
        let resolve = |p: &mut PathBuf| *p = crate::utils::path::normalize_path(&root.join(&*p));
        resolve(&mut self.source);
        resolve(&mut self.includes);
        resolve(&mut self.data);
        resolve(&mut self.stylesheet);
        resolve(&mut self.tool_config);
        resolve(&mut self.output);
        resolve(&mut self.scratch);
        resolve(&mut self.manifest);
        resolve(&mut self.report);
    }

    /// Whether `path` carries one of the template extensions.
    pub fn is_template(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Validate normalized paths.
    ///
    /// # Checks
    /// - `extensions` must not be empty
    /// - `output` and `scratch` must be distinct (`clean` empties both)
    /// - `includes` and `data` outside `source` are never scanned (warning)
    /// - a missing `source` directory yields an empty manifest (warning)
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.extensions,
                format!("{} is empty, no template would be scanned", Self::FIELDS.extensions),
                "use the default: extensions = [\"njk\", \"html\"]",
            );
        }

        if self.output == self.scratch {
            diag.error(
                Self::FIELDS.scratch,
                format!(
                    "{} and {} point to the same directory",
                    Self::FIELDS.output,
                    Self::FIELDS.scratch
                ),
            );
        }

        for (field, dir) in [
            (Self::FIELDS.includes, &self.includes),
            (Self::FIELDS.data, &self.data),
        ] {
            if !dir.starts_with(&self.source) {
                diag.warn(
                    field,
                    format!("{} is outside {}, it has no effect", dir.display(), self.source.display()),
                );
            }
        }

        if !self.source.is_dir() {
            diag.warn(
                Self::FIELDS.source,
                format!("source directory not found: {}", self.source.display()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_paths_defaults() {
        let config = test_parse_config("");
        let paths = &config.paths;

        assert_eq!(paths.source, PathBuf::from("src"));
        assert_eq!(paths.includes, PathBuf::from("src/_includes"));
        assert_eq!(paths.data, PathBuf::from("src/_data"));
        assert_eq!(paths.stylesheet, PathBuf::from("src/css/tailwind.css"));
        assert_eq!(paths.tool_config, PathBuf::from("tailwind.config.js"));
        assert_eq!(paths.output, PathBuf::from("_site/css"));
        assert_eq!(paths.scratch, PathBuf::from(".temp-css"));
        assert_eq!(paths.manifest, PathBuf::from("css-routes-config.json"));
        assert_eq!(paths.report, PathBuf::from("css-build-report.json"));
        assert_eq!(paths.extensions, vec!["njk", "html"]);
    }

    #[test]
    fn test_paths_partial_override() {
        let config = test_parse_config("[paths]\nsource = \"site\"\nextensions = [\"liquid\"]");

        assert_eq!(config.paths.source, PathBuf::from("site"));
        assert_eq!(config.paths.extensions, vec!["liquid"]);
        // untouched fields keep defaults
        assert_eq!(config.paths.output, PathBuf::from("_site/css"));
    }

    #[test]
    fn test_normalize_joins_root() {
        let mut paths = PathsConfig::default();
        paths.normalize(Path::new("/project"));

        assert_eq!(paths.source, PathBuf::from("/project/src"));
        assert_eq!(paths.includes, PathBuf::from("/project/src/_includes"));
        assert_eq!(paths.manifest, PathBuf::from("/project/css-routes-config.json"));
        assert_eq!(paths.tool_config, PathBuf::from("/project/tailwind.config.js"));
    }

    #[test]
    fn test_is_template() {
        let paths = PathsConfig::default();
        assert!(paths.is_template(Path::new("src/index.njk")));
        assert!(paths.is_template(Path::new("src/about.html")));
        assert!(!paths.is_template(Path::new("src/notes.md")));
        assert!(!paths.is_template(Path::new("src/Makefile")));
    }

    #[test]
    fn test_validate_empty_extensions() {
        let paths = PathsConfig {
            extensions: vec![],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        paths.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validate_output_equals_scratch() {
        let paths = PathsConfig {
            scratch: "_site/css".into(),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        paths.validate(&mut diag);
        assert!(
            diag.errors()
                .any(|e| e.field == PathsConfig::FIELDS.scratch)
        );
    }

    #[test]
    fn test_validate_includes_outside_source_warns() {
        let paths = PathsConfig {
            includes: "partials".into(),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        paths.validate(&mut diag);
        assert!(!diag.has_errors());
        assert!(
            diag.warnings()
                .any(|w| w.field == PathsConfig::FIELDS.includes)
        );
    }
}
