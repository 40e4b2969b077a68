//! Project configuration management for `routecss.toml`.
//!
//! The file is optional: without one, every setting takes its default and the
//! project root is the current directory.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── paths      # [paths]
//! │   ├── theme      # [theme]
//! │   ├── tool       # [tool]
//! │   └── watch      # [watch]
//! ├── diagnostics    # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # ProjectConfig, config file lookup
//! ```

mod diagnostics;
pub mod section;

pub use diagnostics::{ConfigDiagnostics, ConfigError, FieldPath};
pub use section::{PathsConfig, ThemeConfig, ToolConfig, WatchConfig};

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file name looked up when `--config` is not given.
pub const DEFAULT_CONFIG_NAME: &str = "routecss.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing routecss.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Source, output and artifact locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// External CSS tool settings
    #[serde(default)]
    pub tool: ToolConfig,

    /// Theme forwarded to generated tool configs
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchConfig,
}

impl ProjectConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file. A missing default config
    /// is fine; a missing explicitly named one is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cwd, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(crate::utils::path::normalize_path(&path));
                config
            }
            None if cli.config != Path::new(DEFAULT_CONFIG_NAME) => {
                return Err(ConfigError::Io(
                    cli.config.clone(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
                )
                .into());
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG_NAME);
                Self::default()
            }
        };

        let root = config
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);

        config.finalize(&root);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Re-read the config file this config was loaded from.
    ///
    /// The root stays fixed. Without a config file the current settings are
    /// returned unchanged.
    pub fn reload(&self) -> Result<Self> {
        let Some(path) = &self.config_path else {
            return Ok(self.clone());
        };

        let mut config = Self::from_path(path)?;
        config.config_path = Some(path.clone());
        config.finalize(&self.root);
        config.validate()?;
        Ok(config)
    }

    /// Set the root and resolve every relative path against it.
    pub fn finalize(&mut self, root: &Path) {
        let root = crate::utils::path::normalize_path(root);
        self.paths.normalize(&root);
        self.watch.normalize(&root);
        self.root = root;
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.paths.validate(&mut diag);
        self.tool.validate(&self.root, &mut diag);
        self.watch.validate(&mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

/// Locate `name`: as given when absolute, otherwise in `start` or the
/// nearest ancestor holding it.
fn find_config_file(start: &Path, name: &Path) -> Option<PathBuf> {
    if name.is_absolute() {
        return name.is_file().then(|| name.to_path_buf());
    }
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config and panic on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Default config rooted at `root` (usually a tempdir).
#[cfg(test)]
pub fn test_config(root: &Path) -> ProjectConfig {
    let mut config = ProjectConfig::default();
    config.finalize(root);
    config
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        let result: Result<ProjectConfig, _> = toml::from_str("[paths\nsource = \"src\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();

        assert!(config.config_path.is_none());
        assert_eq!(config.get_root(), Path::new(""));
        assert_eq!(config.paths.source, PathBuf::from("src"));
        assert_eq!(config.tool.timeout, 30);
        assert!(config.theme.is_empty());
        assert_eq!(config.watch.debounce_ms, 300);
    }

    #[test]
    fn test_finalize_resolves_against_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let root = crate::utils::path::normalize_path(dir.path());

        assert_eq!(config.get_root(), root);
        assert_eq!(config.paths.source, root.join("src"));
        assert_eq!(config.paths.output, root.join("_site/css"));
        assert_eq!(
            config.root_relative(&config.paths.stylesheet),
            PathBuf::from("src/css/tailwind.css")
        );
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[paths]\nsource = \"site\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.paths.source, PathBuf::from("site"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_theme_keys_are_not_unknown() {
        let content = "[theme.extend.colors]\nbrand = \"#000\"";
        let (_, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_validate_reports_all_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.paths.extensions.clear();
        config.tool.timeout = 0;

        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err}");
        };
        assert_eq!(diag.errors().count(), 2);
    }

    #[test]
    fn test_reload_rereads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_NAME);
        fs::write(&path, "[watch]\ndebounce_ms = 300\n").unwrap();

        let mut config = ProjectConfig::from_path(&path).unwrap();
        config.config_path = Some(path.clone());
        config.finalize(dir.path());

        fs::write(&path, "[watch]\ndebounce_ms = 120\n").unwrap();
        let reloaded = config.reload().unwrap();
        assert_eq!(reloaded.watch.debounce_ms, 120);
        assert_eq!(reloaded.get_root(), config.get_root());

        fs::write(&path, "[watch\n").unwrap();
        assert!(config.reload().is_err());
    }

    #[test]
    fn test_reload_without_file_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.watch.debounce_ms = 75;
        assert_eq!(config.reload().unwrap().watch.debounce_ms, 75);
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src/_includes");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "").unwrap();

        let found = find_config_file(&nested, Path::new(DEFAULT_CONFIG_NAME));
        assert_eq!(found, Some(dir.path().join(DEFAULT_CONFIG_NAME)));
    }

    #[test]
    fn test_find_config_file_absolute_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        assert_eq!(find_config_file(dir.path(), &path), None);

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(Path::new("/"), &path), Some(path));
        assert_eq!(find_config_file(dir.path(), Path::new("routecss-missing.toml")), None);
    }
}
