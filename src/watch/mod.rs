//! Watch mode: build once, then re-analyze and rebuild on source changes.
//!
//! ```text
//! notify ──► bridge thread ──► feed loop (Debouncer) ──► RebuildSlot ──► rebuild loop
//! ```
//!
//! The feed loop owns the watcher and turns raw events into debounced
//! batches. Each relevant batch fills the single rebuild slot; the rebuild
//! loop drains it one rebuild at a time, so rebuilds never overlap and a burst
//! of changes during a rebuild yields exactly one follow-up rebuild.

mod debouncer;
mod roots;
mod slot;

pub use debouncer::{ChangeKind, Debouncer};
pub use roots::{WatchRoots, watch_roots};
pub use slot::RebuildSlot;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::RecommendedWatcher;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use crate::analyze;
use crate::build::Builder;
use crate::config::ProjectConfig;
use crate::core::{BuildMode, is_shutdown};
use crate::logger::{status_error, status_success, status_warning};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// How often the feed loop checks for Ctrl+C.
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Run watch mode until Ctrl+C.
pub async fn run(config: ProjectConfig, mode: BuildMode) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("failed to create file watcher")?;

    let mut roots = WatchRoots::new(watch_roots(&config));
    roots
        .attach_existing(&mut watcher)
        .context("failed to watch project files")?;

    let (event_tx, event_rx) = mpsc::channel(64);
    std::thread::spawn(move || {
        for result in rx {
            match result {
                Ok(event) => {
                    if event_tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(e) => crate::debug!("watch"; "watcher error: {}", e),
            }
        }
    });

    log!("watch"; "watching {}, press Ctrl+C to stop", plural_count(roots.attached(), "location"));

    let slot = RebuildSlot::new();
    let reload = AtomicBool::new(false);
    let scope = WatchScope::new(&config);
    let debouncer = Debouncer::new(config.watch.debounce(), config.watch.cooldown());

    // initial build
    slot.request();

    tokio::join!(
        feed(event_rx, watcher, roots, debouncer, &scope, &slot, &reload),
        rebuild_loop(config, mode, &slot, &reload),
    );

    log!("watch"; "stopped");
    Ok(())
}

// ============================================================================
// feed loop
// ============================================================================

async fn feed(
    mut rx: mpsc::Receiver<notify::Event>,
    mut watcher: RecommendedWatcher,
    mut roots: WatchRoots,
    mut debouncer: Debouncer,
    scope: &WatchScope,
    slot: &RebuildSlot,
    reload: &AtomicBool,
) {
    let mut shutdown_poll = tokio::time::interval(SHUTDOWN_POLL);

    loop {
        tokio::select! {
            biased;

            Some(event) = rx.recv() => debouncer.add_event(&event),

            _ = shutdown_poll.tick() => {
                if is_shutdown() {
                    break;
                }
            }

            _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                roots.maintain(&mut watcher);
                let Some(changes) = debouncer.take_if_ready() else {
                    continue;
                };
                dispatch(&changes, scope, slot, reload);
            }
        }
    }

    slot.close();
}

/// Forward a debounced batch to the rebuild loop if anything in it matters.
fn dispatch(
    changes: &FxHashMap<PathBuf, ChangeKind>,
    scope: &WatchScope,
    slot: &RebuildSlot,
    reload: &AtomicBool,
) {
    let mut relevant = 0;
    for (path, kind) in changes {
        match scope.classify(path) {
            Relevance::Config => {
                log!("watch"; "config {}", kind.label());
                reload.store(true, Ordering::SeqCst);
                relevant += 1;
            }
            Relevance::Source => {
                debug!("watch"; "{} {}", kind.label(), path.display());
                relevant += 1;
            }
            Relevance::Ignored => {}
        }
    }

    if relevant > 0 {
        debug!("watch"; "{} changed", plural_count(relevant, "file"));
        slot.request();
    }
}

/// What a changed path means for the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relevance {
    Config,
    Source,
    Ignored,
}

/// Paths that trigger rebuilds, fixed when watching starts.
struct WatchScope {
    config_path: Option<PathBuf>,
    tool_config: PathBuf,
    ignored: Vec<PathBuf>,
    extra: Vec<PathBuf>,
    paths: crate::config::PathsConfig,
}

impl WatchScope {
    fn new(config: &ProjectConfig) -> Self {
        let paths = config.paths.clone();
        Self {
            config_path: config.config_path.clone(),
            tool_config: paths.tool_config.clone(),
            // our own artifacts must never retrigger a build
            ignored: vec![
                paths.output.clone(),
                paths.scratch.clone(),
                paths.manifest.clone(),
                paths.report.clone(),
            ],
            extra: config.watch.extra.clone(),
            paths,
        }
    }

    fn classify(&self, path: &Path) -> Relevance {
        // the theme module is read when the builder starts
        if self.config_path.as_deref() == Some(path) || self.tool_config == path {
            return Relevance::Config;
        }
        if self.ignored.iter().any(|ignored| path.starts_with(ignored)) {
            return Relevance::Ignored;
        }
        if self.paths.is_template(path)
            || path.extension().is_some_and(|ext| ext == "css")
            || self.extra.iter().any(|extra| path.starts_with(extra))
        {
            return Relevance::Source;
        }
        Relevance::Ignored
    }
}

// ============================================================================
// rebuild loop
// ============================================================================

async fn rebuild_loop(
    mut config: ProjectConfig,
    mode: BuildMode,
    slot: &RebuildSlot,
    reload: &AtomicBool,
) {
    let mut initial = true;
    while let Some(next) = serve(&config, mode, slot, reload, &mut initial).await {
        config = next;
    }
}

/// Rebuild on every request until closed or the config changes.
///
/// Returns the reloaded config so the caller can start over with a fresh
/// builder.
async fn serve(
    config: &ProjectConfig,
    mode: BuildMode,
    slot: &RebuildSlot,
    reload: &AtomicBool,
    initial: &mut bool,
) -> Option<ProjectConfig> {
    let builder = Builder::new(config, mode);

    while slot.next().await {
        if reload.swap(false, Ordering::SeqCst) {
            match config.reload() {
                Ok(next) => {
                    status_success("config reloaded");
                    slot.request();
                    return Some(next);
                }
                Err(e) => status_error("config reload failed, keeping previous settings", &format!("{e:#}")),
            }
        }

        rebuild(&builder, config, *initial).await;
        *initial = false;
    }

    None
}

/// One watch cycle. The first one reuses the manifest, later ones re-scan.
async fn rebuild(builder: &Builder<'_>, config: &ProjectConfig, initial: bool) {
    if !initial && let Err(e) = analyze::analyze(config) {
        status_error("analysis failed", &format!("{e:#}"));
        return;
    }

    match builder.build_all().await {
        Ok(outcome) if outcome.failures.is_empty() => {
            status_success(&format!("built {}", plural_count(outcome.results.len(), "stylesheet")));
        }
        Ok(outcome) => {
            let routes: Vec<&str> = outcome.failures.iter().map(|f| f.route.as_str()).collect();
            status_warning(&format!(
                "built {}, failed: {}",
                plural_count(outcome.results.len(), "stylesheet"),
                routes.join(", ")
            ));
        }
        Err(e) => status_error("build failed", &format!("{e:#}")),
    }
}
