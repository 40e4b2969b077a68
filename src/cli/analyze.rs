//! `analyze`: scan templates, report class usage, write the manifest.

use crate::analyze::{self, summary::AnalysisSummary, summary::print_class_listing};
use crate::config::ProjectConfig;
use anyhow::Result;

pub fn run(config: &ProjectConfig, list: bool) -> Result<()> {
    let outcome = analyze::analyze(config)?;

    AnalysisSummary::of(&outcome).print(&outcome.manifest);
    if list {
        print_class_listing(&outcome.manifest);
    }
    Ok(())
}
