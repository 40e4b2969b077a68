//! CSS tool detection.

use crate::config::ToolConfig;
use crate::log;
use crate::utils::exec::{Cmd, OutputFilter};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Progress lines the tool prints on success.
pub static TAILWIND_FILTER: OutputFilter = OutputFilter::new(&["Done in", "Finished in"]);

/// Major CLI generation; decides how a route build is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolVersion {
    /// `-c <config>` with a generated configuration module.
    V3,
    /// `--content <probe>` with a generated source stylesheet.
    V4,
}

impl ToolVersion {
    /// Read the generation from `--help` output. Anything unrecognized is v3.
    pub fn from_help(help: &str) -> Self {
        if help.contains("v4.") || help.contains("version 4") {
            Self::V4
        } else {
            Self::V3
        }
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::V3 => "v3",
            Self::V4 => "v4",
        })
    }
}

/// A working invocation and the CLI generation behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedTool {
    pub command: Vec<String>,
    pub version: ToolVersion,
}

/// Finds the first working tool invocation, once.
///
/// The outcome, including "nothing works", is memoized for the lifetime of
/// the detector, so a build probes at most once however many routes it has.
pub struct ToolDetector {
    candidates: Vec<Vec<String>>,
    probe_timeout: Duration,
    root: PathBuf,
    detected: OnceCell<Option<DetectedTool>>,
}

impl ToolDetector {
    pub fn new(config: &ToolConfig, root: &Path) -> Self {
        Self {
            candidates: config.candidates.clone(),
            probe_timeout: config.probe_timeout(),
            root: root.to_path_buf(),
            detected: OnceCell::new(),
        }
    }

    /// The adopted invocation, or `None` when no candidate works.
    pub async fn detect(&self) -> Option<&DetectedTool> {
        self.detected
            .get_or_init(|| self.probe_all())
            .await
            .as_ref()
    }

    async fn probe_all(&self) -> Option<DetectedTool> {
        log!("build"; "detecting css tool");
        for candidate in &self.candidates {
            if candidate.is_empty() {
                continue;
            }
            let cmd = Cmd::new(candidate.as_slice())
                .arg("--help")
                .cwd(&self.root)
                .timeout(self.probe_timeout)
                .filter(&OutputFilter::SILENT);
            let display = cmd.display();

            match cmd.run().await {
                Ok(output) => {
                    let version = ToolVersion::from_help(&String::from_utf8_lossy(&output.stdout));
                    log!("build"; "using `{}` ({})", candidate.join(" "), version);
                    return Some(DetectedTool {
                        command: candidate.clone(),
                        version,
                    });
                }
                Err(e) => crate::debug!("build"; "`{}` unavailable: {}", display, e),
            }
        }
        log!("warning"; "no working css tool among {} candidates", self.candidates.len());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(candidates: &[&[&str]]) -> ToolDetector {
        let config = ToolConfig {
            candidates: candidates
                .iter()
                .map(|c| c.iter().map(|s| (*s).to_string()).collect())
                .collect(),
            probe_timeout: 2,
            ..ToolConfig::default()
        };
        ToolDetector::new(&config, Path::new("."))
    }

    #[test]
    fn test_version_from_help() {
        assert_eq!(ToolVersion::from_help("tailwindcss v4.0.7\n\nUsage:"), ToolVersion::V4);
        assert_eq!(ToolVersion::from_help("tailwindcss version 4"), ToolVersion::V4);
        assert_eq!(ToolVersion::from_help("tailwindcss v3.4.17\n\nUsage:"), ToolVersion::V3);
        assert_eq!(ToolVersion::from_help(""), ToolVersion::V3);
    }

    #[tokio::test]
    async fn test_no_candidate_available() {
        let detector = detector(&[&["routecss-missing-tool-a"], &["routecss-missing-tool-b"]]);
        assert!(detector.detect().await.is_none());
        // memoized
        assert!(detector.detected.initialized());
        assert!(detector.detect().await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_first_working_candidate_adopted() {
        let detector = detector(&[&["routecss-missing-tool"], &["echo"], &["true"]]);
        let tool = detector.detect().await.unwrap();
        assert_eq!(tool.command, ["echo"]);
        assert_eq!(tool.version, ToolVersion::V3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_v4_detected_with_command() {
        let detector = detector(&[&["echo", "tailwindcss v4.1.0"]]);
        let tool = detector.detect().await.unwrap();
        assert_eq!(tool.version, ToolVersion::V4);
        assert_eq!(tool.command, ["echo", "tailwindcss v4.1.0"]);
    }
}
