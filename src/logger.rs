//! Terminal output: prefixed log lines, the build progress line and the
//! watch-mode status block.
//!
//! ```ignore
//! log!("analyze"; "found {} pages", count);
//! debug!("build"; "{}.css: {} classes", route, n); // --verbose only
//!
//! let mut progress = ProgressLine::new("routes", 7);
//! progress.advance("index");
//! progress.finish();
//! ```
//!
//! While a progress line is on screen, `log!` prints above it and redraws it,
//! so warnings from a route build never get mangled into the counter.

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use parking_lot::Mutex;
use std::{
    fmt,
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Text of the progress line currently on screen, if any.
static PROGRESS: Mutex<Option<String>> = Mutex::new(None);

/// Rows occupied by the last watch status block.
static STATUS_ROWS: Mutex<usize> = Mutex::new(0);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Print `message` behind a colored `[module]` prefix.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only with `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

pub fn log(module: &str, message: &str) {
    let progress = PROGRESS.lock();
    let mut out = stdout().lock();

    if progress.is_some() {
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    }
    writeln!(out, "{} {message}", prefix(module)).ok();
    if let Some(line) = progress.as_deref() {
        write!(out, "{line}").ok();
    }
    out.flush().ok();
}

/// Render `text` in `style` when stdout takes colors.
///
/// Honors `--color`: an override set at startup wins over TTY detection.
pub fn paint(text: impl fmt::Display, style: Style) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.style(style))
        .to_string()
}

fn prefix(module: &str) -> String {
    let style = match module {
        "error" => Style::new().bright_red().bold(),
        "warning" => Style::new().bright_magenta().bold(),
        "hint" => Style::new().bright_cyan(),
        "watch" => Style::new().bright_green().bold(),
        "analyze" | "verify" => Style::new().bright_blue().bold(),
        _ => Style::new().bright_yellow().bold(),
    };
    paint(format!("[{module}]"), style)
}

// ============================================================================
// progress line
// ============================================================================

/// In-place counter for sequential work: `[build] routes(3/7) about`.
pub struct ProgressLine {
    label: &'static str,
    total: usize,
    done: usize,
}

impl ProgressLine {
    pub fn new(label: &'static str, total: usize) -> Self {
        let progress = Self { label, total, done: 0 };
        progress.draw(None, false);
        progress
    }

    /// Count one finished item.
    pub fn advance(&mut self, item: &str) {
        self.done += 1;
        self.draw(Some(item), false);
    }

    /// Leave the final count on screen.
    pub fn finish(self) {
        self.draw(None, true);
    }

    fn draw(&self, item: Option<&str>, last: bool) {
        let line = format!("{} {}", prefix("build"), progress_text(self.label, self.done, self.total, item));
        let mut slot = PROGRESS.lock();
        let mut out = stdout().lock();

        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        if last {
            writeln!(out, "{line}").ok();
            *slot = None;
        } else {
            write!(out, "{line}").ok();
            *slot = Some(line);
        }
        out.flush().ok();
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        // an unfinished line must not keep swallowing log output
        if PROGRESS.lock().take().is_some() {
            println!();
        }
    }
}

fn progress_text(label: &str, done: usize, total: usize, item: Option<&str>) -> String {
    match item {
        Some(item) => format!("{label}({done}/{total}) {}", paint(item, Style::new().dimmed())),
        None => format!("{label}({done}/{total})"),
    }
}

// ============================================================================
// watch status
// ============================================================================

/// Watch mode keeps one status block on screen: each call replaces the
/// previous block instead of scrolling.
pub fn status_success(message: &str) {
    show_status(&paint("✓", Style::new().green()), message);
}

pub fn status_warning(message: &str) {
    show_status(&paint("⚠", Style::new().yellow()), message);
}

pub fn status_error(summary: &str, detail: &str) {
    show_status(&paint("✗", Style::new().red()), &status_message(summary, detail));
}

fn status_message(summary: &str, detail: &str) -> String {
    if detail.is_empty() {
        summary.to_string()
    } else {
        format!("{summary}\n{detail}")
    }
}

fn show_status(symbol: &str, message: &str) {
    let mut rows = STATUS_ROWS.lock();
    let mut out = stdout().lock();

    if *rows > 0 {
        let up = u16::try_from(*rows).unwrap_or(u16::MAX);
        execute!(out, cursor::MoveUp(up), Clear(ClearType::FromCursorDown)).ok();
    }

    let time = crate::utils::date::DateTimeUtc::now().time_of_day();
    writeln!(out, "{} {symbol} {message}", paint(format!("[{time}]"), Style::new().dimmed())).ok();
    out.flush().ok();

    *rows = message.lines().count().max(1);
}
