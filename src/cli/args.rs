//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Route-scoped utility CSS builds: one stylesheet per page
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory (optional)
    #[arg(short = 'C', long, global = true, default_value = "routecss.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Show debug output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Force production mode (minified output) regardless of the environment
    #[arg(long, global = true)]
    pub production: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan templates, print the class usage report and write the manifest
    #[command(visible_alias = "a")]
    Analyze {
        /// Also list every detected class per route
        #[arg(short, long)]
        list: bool,
    },

    /// Build one stylesheet per route and write the build report
    #[command(visible_alias = "b")]
    Build,

    /// Build once, then re-analyze and rebuild on every source change
    #[command(visible_alias = "w")]
    Watch,

    /// Remove generated stylesheets and scratch files
    Clean,

    /// Discard the manifest, clean, then build from a fresh analysis
    Rebuild,

    /// Check generated stylesheets for baseline (preflight) styles
    #[command(visible_alias = "v")]
    Verify {
        #[command(subcommand)]
        target: VerifyTarget,
    },
}

/// What `verify` inspects
#[derive(Subcommand, Debug, Clone)]
pub enum VerifyTarget {
    /// Verify one stylesheet
    File {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: PathBuf,
    },

    /// Verify every stylesheet in the output directory
    All,

    /// Print the rules targeting base elements in one stylesheet
    Rules {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: PathBuf,
    },
}

impl Cli {
    pub const fn is_watch(&self) -> bool {
        matches!(self.command, Commands::Watch)
    }
}
