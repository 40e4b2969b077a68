//! Watched locations.

use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

use crate::config::ProjectConfig;

/// Roots watched for `config`: source tree, stylesheet directory, config
/// files and extra paths. Roots nested in another root are dropped.
pub fn watch_roots(config: &ProjectConfig) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = vec![config.paths.source.clone()];
    if let Some(dir) = config.paths.stylesheet.parent() {
        candidates.push(dir.to_path_buf());
    }
    candidates.extend(config.config_path.clone());
    candidates.push(config.paths.tool_config.clone());
    candidates.extend(config.watch.extra.iter().cloned());

    candidates.sort();
    candidates.dedup();

    let mut roots: Vec<PathBuf> = Vec::with_capacity(candidates.len());
    for path in candidates {
        // sorted: a parent always precedes its descendants
        if !roots.iter().any(|root| path.starts_with(root)) {
            roots.push(path);
        }
    }
    roots
}

/// Keeps watches attached to roots that are deleted and recreated.
pub struct WatchRoots {
    desired: Vec<PathBuf>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            desired: paths,
            attached: FxHashSet::default(),
        }
    }

    pub fn attach_existing(&mut self, watcher: &mut RecommendedWatcher) -> notify::Result<()> {
        for path in &self.desired {
            if !path.exists() {
                crate::debug!("watch"; "not watching missing {}", path.display());
                continue;
            }
            watcher.watch(path, RecursiveMode::Recursive)?;
            self.attached.insert(path.clone());
        }
        Ok(())
    }

    pub fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        self.attached.retain(|path| path.exists());

        for path in &self.desired {
            if self.attached.contains(path) || !path.exists() {
                continue;
            }
            if watcher.watch(path, RecursiveMode::Recursive).is_ok() {
                self.attached.insert(path.clone());
                crate::debug!("watch"; "re-attached watch: {}", path.display());
            }
        }
    }

    pub fn attached(&self) -> usize {
        self.attached.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_nested_roots_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.config_path = Some(config.root.join("routecss.toml"));
        config.watch.extra = vec![config.root.join("tailwind.config.js"), config.root.join("src/_data")];

        let roots = watch_roots(&config);
        // src/css (stylesheet dir) and src/_data live under src
        assert_eq!(
            roots,
            vec![
                config.root.join("routecss.toml"),
                config.root.join("src"),
                config.root.join("tailwind.config.js"),
            ]
        );
    }

    #[test]
    fn test_theme_module_watched_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let roots = watch_roots(&config);
        assert!(roots.contains(&config.root.join("tailwind.config.js")));
    }

    #[test]
    fn test_stylesheet_outside_source_is_watched() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.paths.stylesheet = config.root.join("styles/main.css");

        let roots = watch_roots(&config);
        assert!(roots.contains(&config.root.join("styles")));
        assert!(roots.contains(&config.paths.source));
    }
}
