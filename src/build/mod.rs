//! Route build orchestration.
//!
//! | Module    | Role                                          |
//! |-----------|-----------------------------------------------|
//! | `probe`   | probe document, tool config, scratch guard    |
//! | `tool`    | memoized tool detection                       |
//! | `tier`    | the fallback chain                            |
//! | `library` | in-process pipeline for the second tier       |
//!
//! Routes are built one after another. Each route walks the tiers in order
//! and stops at the first one that writes a non-empty stylesheet; a route
//! only fails when even the baseline copy cannot be written.

mod library;
mod probe;
mod tier;
mod tool;

pub use library::{LibraryEngine, LibraryError, LibraryInput, LightningEngine, PREFLIGHT};
pub use tier::Tier;
pub use tool::ToolDetector;

use crate::config::ProjectConfig;
use crate::core::BuildMode;
use crate::logger::ProgressLine;
use crate::manifest::{RouteManifestEntry, load_or_analyze};
use crate::report::{self, BuildResult};
use crate::utils::exec::{Cmd, ExecError};
use crate::{debug, log};
use anyhow::{Context, Result};
use probe::{ProbeFiles, ThemeSource};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tool::{TAILWIND_FILTER, ToolVersion};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no working css tool found")]
    ToolUnavailable,

    #[error("css tool failed: {0}")]
    Invocation(String),

    #[error("css tool timed out after {}s", .0.as_secs())]
    Timeout(std::time::Duration),

    #[error("{} was not produced", .0.display())]
    MissingOutput(PathBuf),

    #[error("{engine} failed")]
    Library {
        engine: &'static str,
        #[source]
        source: LibraryError,
    },

    #[error("stylesheet not found: {}", .0.display())]
    MissingStylesheet(PathBuf),

    #[error("cannot access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<ExecError> for BuildError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Timeout { timeout, .. } => Self::Timeout(timeout),
            other => Self::Invocation(other.to_string()),
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A route whose every tier failed.
#[derive(Debug, Clone)]
pub struct RouteFailure {
    pub route: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct BuildOutcome {
    pub results: Vec<BuildResult>,
    pub failures: Vec<RouteFailure>,
}

/// Builds one stylesheet per manifest route.
pub struct Builder<'a> {
    config: &'a ProjectConfig,
    mode: BuildMode,
    tool: ToolDetector,
    library: Box<dyn LibraryEngine>,
    theme: ThemeSource,
}

impl<'a> Builder<'a> {
    pub fn new(config: &'a ProjectConfig, mode: BuildMode) -> Self {
        Self {
            config,
            mode,
            tool: ToolDetector::new(&config.tool, config.get_root()),
            library: Box::new(LightningEngine::default()),
            theme: ThemeSource::resolve(config),
        }
    }

    /// Replace the in-process engine used by the second tier.
    #[allow(dead_code)]
    pub fn with_library(mut self, library: Box<dyn LibraryEngine>) -> Self {
        self.library = library;
        self
    }

    fn output_path(&self, route: &str) -> PathBuf {
        self.config.paths.output.join(format!("{route}.css"))
    }

    /// Build one route, falling back tier by tier.
    pub async fn build_route(&self, entry: &RouteManifestEntry) -> Result<BuildResult, BuildError> {
        let output = self.output_path(&entry.route);
        debug!("build"; "{}.css: {} classes", entry.route, entry.classes.len());

        let mut tier = Tier::PrimaryTool;
        loop {
            let attempt = match tier {
                Tier::PrimaryTool => self.run_tool(entry, &output).await,
                Tier::FallbackLibrary => self.run_library(entry, &output),
                Tier::BaselineCopy => self.copy_baseline(entry, &output),
            };

            match attempt {
                Ok(size) => {
                    let output = self.config.root_relative(&output);
                    return Ok(BuildResult::new(&entry.route, output, size, entry.classes.len(), tier));
                }
                Err(err) => match tier.next() {
                    Some(next) => {
                        log!("warning"; "{}.css: {} failed ({}), trying {}", entry.route, tier, error_chain(&err), next);
                        tier = next;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    /// First tier: the external tool over the route's probe document.
    async fn run_tool(&self, entry: &RouteManifestEntry, output: &Path) -> Result<u64, BuildError> {
        let tool = self.tool.detect().await.ok_or(BuildError::ToolUnavailable)?;
        let mut probe = self.write_probe(entry)?;

        // A stale stylesheet from an earlier build must not pass verification.
        remove_if_exists(output)?;

        let paths = &self.config.paths;
        let (input, timeout) = match tool.version {
            ToolVersion::V3 => (paths.stylesheet.clone(), self.config.tool.build_timeout()),
            ToolVersion::V4 => {
                let base = fs::read_to_string(&paths.stylesheet).map_err(io_error(&paths.stylesheet))?;
                let source = probe
                    .write_v4_source(&base)
                    .map_err(io_error(&paths.scratch))?;
                (source, self.config.tool.build_timeout_v4())
            }
        };

        let cmd = Cmd::new(tool.command.as_slice())
            .args(tool_args(tool.version, &input, output, &probe, self.mode))
            .cwd(self.config.get_root())
            .timeout(timeout)
            .filter(&TAILWIND_FILTER);

        debug!("build"; "running {}", cmd.display());
        cmd.run().await?;
        verify_output(output)
    }

    /// Second tier: the in-process pipeline.
    fn run_library(&self, entry: &RouteManifestEntry, output: &Path) -> Result<u64, BuildError> {
        let probe = self.write_probe(entry)?;
        let stylesheet = &self.config.paths.stylesheet;
        let source = fs::read_to_string(stylesheet).map_err(io_error(stylesheet))?;

        let css = self
            .library
            .compile(&LibraryInput {
                source: &source,
                filename: stylesheet,
                keep: &probe.safelist,
                minify: self.mode.is_production(),
            })
            .map_err(|source| BuildError::Library {
                engine: self.library.name(),
                source,
            })?;

        fs::write(output, css).map_err(io_error(output))?;
        verify_output(output)
    }

    /// Last tier: the base stylesheet, unmodified, under a marker comment.
    fn copy_baseline(&self, entry: &RouteManifestEntry, output: &Path) -> Result<u64, BuildError> {
        let stylesheet = &self.config.paths.stylesheet;
        let source = fs::read_to_string(stylesheet).map_err(io_error(stylesheet))?;
        let css = format!("/* Fallback CSS for {} - baseline copy */\n{}", entry.route, source);

        fs::write(output, css).map_err(io_error(output))?;
        verify_output(output)
    }

    fn write_probe(&self, entry: &RouteManifestEntry) -> Result<ProbeFiles, BuildError> {
        let scratch = &self.config.paths.scratch;
        ProbeFiles::write(scratch, &entry.route, &entry.classes, &self.theme)
            .map_err(io_error(scratch))
    }

    /// Build every route in the manifest and publish the report.
    pub async fn build_all(&self) -> Result<BuildOutcome> {
        let paths = &self.config.paths;

        if !paths.stylesheet.is_file() {
            let display = self.config.root_relative(&paths.stylesheet);
            log!("error"; "stylesheet not found: {}", display.display());
            if let Some(parent) = display.parent().filter(|p| !p.as_os_str().is_empty()) {
                log!("hint"; "mkdir -p {}", parent.display());
            }
            log!("hint"; "printf '@tailwind base;\\n@tailwind components;\\n@tailwind utilities;\\n' > {}", display.display());
            return Err(BuildError::MissingStylesheet(paths.stylesheet.clone()).into());
        }

        for dir in [&paths.output, &paths.scratch] {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let manifest = load_or_analyze(self.config)?;
        if manifest.is_empty() {
            log!("warning"; "no routes to build");
            return Ok(BuildOutcome::default());
        }

        log!("build"; "building {} routes ({})", manifest.len(), self.mode.label());

        let mut outcome = BuildOutcome::default();
        let mut progress = ProgressLine::new("routes", manifest.len());
        for entry in manifest.pages.values() {
            match self.build_route(entry).await {
                Ok(result) => outcome.results.push(result),
                Err(err) => {
                    let error = error_chain(&err);
                    log!("error"; "{}.css: {}", entry.route, error);
                    outcome.failures.push(RouteFailure {
                        route: entry.route.clone(),
                        error,
                    });
                }
            }
            progress.advance(&entry.route);
        }
        progress.finish();

        report::publish(&outcome.results, &paths.report);
        Ok(outcome)
    }
}

/// Tool arguments after the command itself.
///
/// v3 reads the probe configuration module (`-c`); v4 ignores it and scans
/// the probe document given as `--content`.
fn tool_args(
    version: ToolVersion,
    input: &Path,
    output: &Path,
    probe: &ProbeFiles,
    mode: BuildMode,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), input.into(), "-o".into(), output.into()];
    match version {
        ToolVersion::V3 => args.extend(["-c".into(), probe.config.clone().into()]),
        ToolVersion::V4 => args.extend(["--content".into(), probe.html.clone().into()]),
    }
    if mode.is_production() {
        args.push("--minify".into());
    }
    args
}

/// Size of a produced stylesheet; missing or empty is a failure.
fn verify_output(output: &Path) -> Result<u64, BuildError> {
    match fs::metadata(output) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(meta.len()),
        _ => Err(BuildError::MissingOutput(output.to_path_buf())),
    }
}

fn remove_if_exists(path: &Path) -> Result<(), BuildError> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(io_error(path)(e)),
        _ => Ok(()),
    }
}

/// `err` and its sources on one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
