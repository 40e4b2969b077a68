//! Absolute path helpers.

use std::path::{Path, PathBuf};

/// Absolute form of `path`, symlinks resolved when it exists.
///
/// A path that does not exist yet (an output file, a deleted template) is
/// joined onto the working directory instead, never rejected.
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Resolve a user-supplied path such as `verify file index.css`.
///
/// Absolute paths and paths that exist relative to the working directory win;
/// anything else is looked up under `base` (the output directory).
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else if path.exists() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_paths_become_absolute() {
        assert!(normalize_path(Path::new("src/never-created.njk")).is_absolute());
        assert_eq!(
            normalize_path(Path::new("/routecss-missing/index.css")),
            PathBuf::from("/routecss-missing/index.css")
        );
    }

    #[test]
    fn test_existing_paths_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("css");
        std::fs::create_dir(&nested).unwrap();

        let dotted = dir.path().join("css/../css");
        assert_eq!(normalize_path(&dotted), nested.canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_under_base() {
        assert_eq!(
            resolve_path(Path::new("routecss-missing/pricing.css"), Path::new("/site/css")),
            PathBuf::from("/site/css/routecss-missing/pricing.css")
        );
        assert_eq!(resolve_path(Path::new("/abs.css"), Path::new("/site")), PathBuf::from("/abs.css"));
    }
}
