//! Manifest persistence.

use super::Manifest;
use crate::{analyze, config::ProjectConfig, log};
use anyhow::Result;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot access manifest `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("manifest `{path}` is not valid JSON")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize manifest")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes the manifest file.
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_config(config: &ProjectConfig) -> Self {
        Self::new(&config.paths.manifest)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the manifest as pretty JSON.
    pub fn save(&self, manifest: &Manifest) -> Result<(), ManifestError> {
        let json = serde_json::to_string_pretty(manifest)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        fs::write(&self.path, json).map_err(|source| self.io_error(source))
    }

    /// Read the manifest. An absent file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<Manifest>, ManifestError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ManifestError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    /// Delete the manifest. Returns whether a file was removed.
    pub fn invalidate(&self) -> Result<bool, ManifestError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> ManifestError {
        ManifestError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Reuse the persisted manifest, or analyze the project to produce one.
///
/// A corrupt manifest is replaced by a fresh analysis.
pub fn load_or_analyze(config: &ProjectConfig) -> Result<Manifest> {
    let store = ManifestStore::for_config(config);
    let display = config.root_relative(store.path());

    match store.load() {
        Ok(Some(manifest)) => {
            match manifest.generated_at() {
                Some(at) => log!("build"; "using manifest {} (generated {} {} UTC)", display.display(), at.date(), at.time_of_day()),
                None => log!("build"; "using manifest {}", display.display()),
            }
            if !manifest.is_current() {
                log!("warning"; "{} was classified with an older utility table, run `rebuild` to refresh", display.display());
            }
            Ok(manifest)
        }
        Ok(None) => {
            log!("build"; "no manifest found, analyzing project");
            Ok(analyze::analyze(config)?.manifest)
        }
        Err(e @ ManifestError::Corrupt { .. }) => {
            log!("warning"; "{}, analyzing project", e);
            Ok(analyze::analyze(config)?.manifest)
        }
        Err(e) => Err(e.into()),
    }
}
