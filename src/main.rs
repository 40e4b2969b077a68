//! routecss - route-scoped utility CSS builds for static sites.

mod analyze;
mod build;
mod cli;
mod config;
mod core;
mod logger;
mod manifest;
mod report;
mod utils;
mod verify;
mod watch;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;
use core::BuildMode;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // Ctrl+C: immediate exit, except in watch mode which stops between rebuilds
    core::setup_shutdown_handler(cli.is_watch())?;

    let config = ProjectConfig::load(&cli)?;
    let mode = BuildMode::detect(&config.tool.production_env, cli.production);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(run(&cli, config, mode))
}

async fn run(cli: &Cli, config: ProjectConfig, mode: BuildMode) -> Result<()> {
    match &cli.command {
        Commands::Analyze { list } => cli::analyze::run(&config, *list),
        Commands::Build => cli::build::run(&config, mode).await,
        Commands::Watch => watch::run(config, mode).await,
        Commands::Clean => cli::clean::run(&config).map(|_| ()),
        Commands::Rebuild => cli::build::rebuild(&config, mode).await,
        Commands::Verify { target } => cli::verify::run(&config, target),
    }
}
