//! `verify`: check generated stylesheets for baseline styles.

use crate::cli::VerifyTarget;
use crate::config::ProjectConfig;
use crate::utils::path::resolve_path;
use crate::verify;
use anyhow::Result;

pub fn run(config: &ProjectConfig, target: &VerifyTarget) -> Result<()> {
    let output = &config.paths.output;

    match target {
        VerifyTarget::File { path } => {
            verify::verify_file(&resolve_path(path, output))?;
        }
        VerifyTarget::All => {
            verify::verify_all(output)?;
        }
        VerifyTarget::Rules { path } => {
            verify::print_rules(&resolve_path(path, output))?;
        }
    }
    Ok(())
}
