//! Running the external CSS tool.
//!
//! Every run is bounded by a wall-clock timeout; the child is spawned with
//! `kill_on_drop`, so a timed-out tool never outlives its build.
//!
//! ```ignore
//! Cmd::new(&["npx", "tailwindcss"])
//!     .args(["-i", "src/css/tailwind.css", "-o", "_site/css/index.css"])
//!     .cwd(root)
//!     .timeout(Duration::from_secs(30))
//!     .filter(&TAILWIND_FILTER)
//!     .run()
//!     .await?;
//! ```

use regex::Regex;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{ExitStatus, Output, Stdio};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("cannot run `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` timed out after {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    #[error("`{program}` exited with {status}{}", detail_suffix(.detail))]
    Status {
        program: String,
        status: ExitStatus,
        detail: String,
    },
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {detail}")
    }
}

/// Which tool output lines are noise.
pub struct OutputFilter {
    skip: &'static [&'static str],
}

impl OutputFilter {
    /// Keep everything.
    pub const NONE: Self = Self::new(&[]);

    /// Drop everything (availability probes).
    pub const SILENT: Self = Self::new(&[""]);

    pub const fn new(skip: &'static [&'static str]) -> Self {
        Self { skip }
    }

    /// Non-empty lines without ANSI codes that match no skip pattern.
    pub fn keep(&self, output: &str) -> Vec<String> {
        output
            .lines()
            .map(|line| ANSI.replace_all(line, "").trim().to_string())
            .filter(|line| !line.is_empty() && !self.skip.iter().any(|p| line.contains(p)))
            .collect()
    }
}

static ANSI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());

/// One external invocation.
pub struct Cmd {
    argv: Vec<OsString>,
    cwd: Option<PathBuf>,
    timeout: Duration,
    filter: &'static OutputFilter,
}

impl Cmd {
    /// `invocation` is the program followed by its leading arguments,
    /// e.g. `["npx", "tailwindcss"]`.
    pub fn new<S: AsRef<OsStr>>(invocation: &[S]) -> Self {
        Self {
            argv: invocation.iter().map(|s| s.as_ref().to_owned()).collect(),
            cwd: None,
            timeout: Duration::from_secs(30),
            filter: &OutputFilter::NONE,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.argv.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<S: AsRef<OsStr>>(mut self, args: impl IntoIterator<Item = S>) -> Self {
        self.argv.extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn filter(mut self, filter: &'static OutputFilter) -> Self {
        self.filter = filter;
        self
    }

    /// The command line, for logs.
    pub fn display(&self) -> String {
        self.argv
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn program(&self) -> String {
        self.argv
            .first()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Run to completion. A non-zero exit and an expired timeout are errors.
    ///
    /// Stderr lines that survive the filter are logged as warnings on success.
    pub async fn run(self) -> Result<Output, ExecError> {
        let program = self.program();
        let Some((bin, rest)) = self.argv.split_first() else {
            return Err(ExecError::Spawn {
                program,
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            });
        };

        let mut command = Command::new(bin);
        command
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| ExecError::Spawn {
            program: program.clone(),
            source,
        })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ExecError::Timeout {
                program: program.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| ExecError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stderr = self.filter.keep(&String::from_utf8_lossy(&output.stderr));
        if !output.status.success() {
            let mut detail = stderr;
            if detail.is_empty() {
                detail = self.filter.keep(&String::from_utf8_lossy(&output.stdout));
            }
            return Err(ExecError::Status {
                program,
                status: output.status,
                detail: detail.join("\n"),
            });
        }

        if !stderr.is_empty() {
            crate::log!("warning"; "{}: {}", program, stderr.join("\n"));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PROGRESS: OutputFilter = OutputFilter::new(&["Done in", "Finished in"]);

    #[test]
    fn test_display() {
        let cmd = Cmd::new(&["npx", "tailwindcss"]).arg("--help").args(["-o", "out.css"]);
        assert_eq!(cmd.display(), "npx tailwindcss --help -o out.css");
        assert_eq!(cmd.program(), "npx");
    }

    #[test]
    fn test_filter_keeps_real_warnings() {
        let kept = PROGRESS.keep("\x1b[32mDone in 120ms.\x1b[0m\n\nwarn - no utility classes detected\n");
        assert_eq!(kept, vec!["warn - no utility classes detected"]);
        assert!(OutputFilter::SILENT.keep("anything\nat all").is_empty());
        assert_eq!(OutputFilter::NONE.keep("a\n\nb").len(), 2);
    }

    #[tokio::test]
    async fn test_empty_invocation() {
        let empty: [&str; 0] = [];
        let err = Cmd::new(&empty).run().await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = Cmd::new(&["routecss-definitely-not-a-binary"]).run().await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_and_failure() {
        let output = Cmd::new(&["echo", "hello"]).run().await.unwrap();
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));

        let err = Cmd::new(&["false"]).run().await.unwrap_err();
        assert!(matches!(err, ExecError::Status { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills() {
        let err = Cmd::new(&["sleep", "5"])
            .timeout(Duration::from_millis(100))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::Timeout { .. }));
    }
}
