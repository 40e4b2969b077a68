//! `build` and `rebuild`.

use crate::build::Builder;
use crate::cli::clean;
use crate::config::ProjectConfig;
use crate::core::BuildMode;
use crate::manifest::ManifestStore;
use crate::utils::plural::plural_count;
use crate::log;
use anyhow::Result;

/// Build one stylesheet per route.
///
/// Routes that fail every tier are reported but do not fail the command.
pub async fn run(config: &ProjectConfig, mode: BuildMode) -> Result<()> {
    let outcome = Builder::new(config, mode).build_all().await?;

    if !outcome.failures.is_empty() {
        log!(
            "warning";
            "{} failed: {}",
            plural_count(outcome.failures.len(), "route"),
            outcome.failures.iter().map(|f| f.route.as_str()).collect::<Vec<_>>().join(", ")
        );
    }
    Ok(())
}

/// Discard the manifest, clean, then build from a fresh analysis.
pub async fn rebuild(config: &ProjectConfig, mode: BuildMode) -> Result<()> {
    let store = ManifestStore::for_config(config);
    if store.invalidate()? {
        log!("rebuild"; "removed {}", config.root_relative(store.path()).display());
    }

    clean::run(config)?;
    run(config, mode).await
}
