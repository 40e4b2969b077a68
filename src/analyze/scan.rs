//! Project scanning: templates to route manifest.

use super::extract::{ClassBreakdown, scan_file};
use super::route::route_name;
use crate::config::{PathsConfig, ProjectConfig};
use crate::manifest::{Manifest, ManifestStore, RouteManifestEntry};
use crate::{debug, log};
use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use jwalk::WalkDir;
use std::path::{Path, PathBuf};

/// Base CSS overhead assumed by [`estimate_size_kb`], in bytes.
const BASE_SIZE_BYTES: usize = 2048;
const UTILITY_BYTES: usize = 50;
const CUSTOM_BYTES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Rendered page, gets its own stylesheet.
    Page,
    /// Shared partial, merged into every page.
    Include,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: PathBuf,
    pub kind: TemplateKind,
}

/// Two pages mapped to the same route; `replaced` lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCollision {
    pub route: String,
    pub kept: PathBuf,
    pub replaced: PathBuf,
}

#[derive(Debug)]
pub struct ScanOutcome {
    pub manifest: Manifest,
    /// Union of every include's classes.
    pub shared: IndexSet<String>,
    pub include_count: usize,
    pub collisions: Vec<RouteCollision>,
}

/// Find template files under the source directory, sorted by path.
///
/// Files under `data` are skipped; files under `includes` are includes.
pub fn discover(paths: &PathsConfig) -> Vec<TemplateFile> {
    let mut files: Vec<PathBuf> = WalkDir::new(&paths.source)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| paths.is_template(p) && !p.starts_with(&paths.data))
        .collect();
    files.sort();

    files
        .into_iter()
        .map(|path| {
            let kind = if path.starts_with(&paths.includes) {
                TemplateKind::Include
            } else {
                TemplateKind::Page
            };
            TemplateFile { path, kind }
        })
        .collect()
}

/// Estimated stylesheet size in KB, rounded to one decimal.
#[allow(clippy::cast_precision_loss)]
pub fn estimate_size_kb(classes: &IndexSet<String>) -> f64 {
    let breakdown = ClassBreakdown::of(classes);
    let bytes = breakdown.utility.len() * UTILITY_BYTES
        + breakdown.custom.len() * CUSTOM_BYTES
        + BASE_SIZE_BYTES;
    (bytes as f64 / 1024.0 * 10.0).round() / 10.0
}

/// Scan every template and assemble the manifest in memory.
pub fn scan_project(config: &ProjectConfig) -> ScanOutcome {
    let paths = &config.paths;
    let (includes, pages): (Vec<_>, Vec<_>) = discover(paths)
        .into_iter()
        .partition(|f| f.kind == TemplateKind::Include);

    log!("analyze"; "found {} pages and {} includes", pages.len(), includes.len());

    let mut shared = IndexSet::new();
    for include in &includes {
        let scan = scan_file(&include.path);
        debug!("analyze"; "include {}: {} classes", relative(&include.path, &paths.source).display(), scan.classes.len());
        shared.extend(scan.classes);
    }

    let mut entries: IndexMap<String, RouteManifestEntry> = IndexMap::new();
    let mut collisions = Vec::new();

    for page in &pages {
        let Some(route) = route_name(&page.path, &paths.source) else {
            log!("warning"; "skipping {}: no usable route name", page.path.display());
            continue;
        };

        let page_classes = scan_file(&page.path).classes;
        let mut classes = page_classes.clone();
        classes.extend(shared.iter().cloned());

        let entry = RouteManifestEntry {
            route: route.clone(),
            source_file_path: config.root_relative(&page.path),
            relative_path: relative(&page.path, &paths.source),
            page_specific_classes: page_classes,
            total_classes: classes.len(),
            estimated_size_kb: estimate_size_kb(&classes),
            classes,
        };

        debug!("analyze"; "{} -> {}.css: {} classes (~{}KB)",
            entry.relative_path.display(), route, entry.total_classes, entry.estimated_size_kb);

        if let Some(previous) = entries.insert(route.clone(), entry) {
            log!("warning"; "route `{}` from {} replaces {}", route,
                config.root_relative(&page.path).display(), previous.source_file_path.display());
            collisions.push(RouteCollision {
                route,
                kept: config.root_relative(&page.path),
                replaced: previous.source_file_path,
            });
        }
    }

    ScanOutcome {
        manifest: Manifest::new(entries),
        shared,
        include_count: includes.len(),
        collisions,
    }
}

/// Scan the project and persist the manifest.
pub fn analyze(config: &ProjectConfig) -> Result<ScanOutcome> {
    let outcome = scan_project(config);
    let store = ManifestStore::for_config(config);
    store.save(&outcome.manifest)?;
    log!("analyze"; "saved {} routes to {}", outcome.manifest.len(), config.root_relative(store.path()).display());
    Ok(outcome)
}

fn relative(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base).unwrap_or(path).to_path_buf()
}
