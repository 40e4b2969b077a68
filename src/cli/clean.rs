//! `clean`: remove generated stylesheets and probe scratch files.

use crate::config::ProjectConfig;
use crate::log;
use crate::utils::plural::plural_count;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// What `clean` removed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub stylesheets: usize,
    pub scratch: usize,
}

/// Remove `*.css` and `*.css.map` from the output directory and every regular
/// file from the scratch directory. Directories are left in place.
pub fn run(config: &ProjectConfig) -> Result<CleanStats> {
    let paths = &config.paths;

    let stylesheets = if paths.output.is_dir() {
        remove_files(&paths.output, is_stylesheet)?
    } else {
        0
    };

    fs::create_dir_all(&paths.scratch)
        .with_context(|| format!("failed to create {}", paths.scratch.display()))?;
    let scratch = remove_files(&paths.scratch, |_| true)?;

    log!(
        "clean";
        "removed {} and {}",
        plural_count(stylesheets, "stylesheet"),
        plural_count(scratch, "scratch file")
    );
    Ok(CleanStats { stylesheets, scratch })
}

fn is_stylesheet(name: &str) -> bool {
    name.ends_with(".css") || name.ends_with(".css.map")
}

/// Delete regular files in `dir` (not recursive) whose name `matches`.
fn remove_files(dir: &Path, matches: impl Fn(&str) -> bool) -> Result<usize> {
    let mut removed = 0;
    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let is_file = entry.file_type().is_ok_and(|t| t.is_file());
        let name = entry.file_name();
        if !is_file || !matches(&name.to_string_lossy()) {
            continue;
        }
        fs::remove_file(&path).with_context(|| format!("failed to remove {}", path.display()))?;
        crate::debug!("clean"; "removed {}", path.display());
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_clean_removes_only_stylesheets() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let output = &config.paths.output;

        touch(&output.join("index.css"));
        touch(&output.join("about.css.map"));
        touch(&output.join("readme.txt"));
        touch(&output.join("nested/deep.css"));
        touch(&config.paths.scratch.join("index.html"));
        touch(&config.paths.scratch.join("tailwind-index.config.js"));

        let stats = run(&config).unwrap();
        assert_eq!(stats, CleanStats { stylesheets: 2, scratch: 2 });

        assert!(!output.join("index.css").exists());
        assert!(!output.join("about.css.map").exists());
        assert!(output.join("readme.txt").exists());
        assert!(output.join("nested/deep.css").exists());
        assert!(config.paths.scratch.is_dir());
        assert_eq!(fs::read_dir(&config.paths.scratch).unwrap().count(), 0);
    }

    #[test]
    fn test_clean_creates_missing_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let stats = run(&config).unwrap();
        assert_eq!(stats, CleanStats::default());
        assert!(config.paths.scratch.is_dir());
        assert!(!config.paths.output.exists());
    }

    #[test]
    fn test_is_stylesheet() {
        assert!(is_stylesheet("index.css"));
        assert!(is_stylesheet("index.css.map"));
        assert!(!is_stylesheet("index.scss"));
        assert!(!is_stylesheet("index.html"));
    }
}
