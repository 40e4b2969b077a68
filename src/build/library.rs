//! In-process stylesheet pipeline used when the external tool is unavailable.
//!
//! Utilities cannot be generated without the tool, so this tier works on the
//! base stylesheet alone: `@tailwind base` (or `@import "tailwindcss"`) is
//! replaced by an embedded preflight, the remaining directives are dropped,
//! and class rules the route does not use are pruned.

use indexmap::IndexSet;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

/// Element reset, without any class rules.
pub const PREFLIGHT_BASE: &str = include_str!("preflight-base.css");

/// Base reset and essential utilities injected for `@tailwind base`.
pub const PREFLIGHT: &str = concat!(
    include_str!("preflight-base.css"),
    "\n",
    include_str!("preflight-utilities.css")
);

static BASE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@tailwind\s+base\s*;|@import\s+["']tailwindcss["']\s*;"#).unwrap()
});

static OTHER_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@tailwind\s+[\w-]+\s*;").unwrap());

static APPLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@apply\b").unwrap());

static CLASS_SELECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.((?:\\.|[A-Za-z_-])(?:\\.|[\w-])*)").unwrap());

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("`@apply` needs the css tool to expand utilities")]
    Apply,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("minify error: {0}")]
    Minify(String),

    #[error("print error: {0}")]
    Print(String),
}

/// What the library tier compiles for one route.
pub struct LibraryInput<'a> {
    /// Base stylesheet text.
    pub source: &'a str,
    pub filename: &'a Path,
    /// Classes whose rules must survive pruning.
    pub keep: &'a IndexSet<String>,
    pub minify: bool,
}

pub trait LibraryEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn compile(&self, input: &LibraryInput<'_>) -> Result<String, LibraryError>;
}

/// [`LibraryEngine`] backed by lightningcss.
pub struct LightningEngine {
    browsers: Browsers,
}

impl Default for LightningEngine {
    fn default() -> Self {
        Self {
            browsers: Browsers {
                chrome: Some(95 << 16),
                edge: Some(95 << 16),
                firefox: Some(90 << 16),
                safari: Some(14 << 16),
                ios_saf: Some(14 << 16),
                ..Browsers::default()
            },
        }
    }
}

impl LibraryEngine for LightningEngine {
    fn name(&self) -> &'static str {
        "lightningcss"
    }

    fn compile(&self, input: &LibraryInput<'_>) -> Result<String, LibraryError> {
        let css = expand_directives(input.source)?;
        let targets = Targets::from(self.browsers);

        let mut sheet = StyleSheet::parse(
            &css,
            ParserOptions {
                filename: input.filename.to_string_lossy().into_owned(),
                ..ParserOptions::default()
            },
        )
        .map_err(|e| LibraryError::Parse(e.to_string()))?;

        sheet
            .minify(MinifyOptions {
                targets,
                unused_symbols: unused_symbols(&css, input.keep),
            })
            .map_err(|e| LibraryError::Minify(e.to_string()))?;

        let output = sheet
            .to_css(PrinterOptions {
                minify: input.minify,
                targets,
                ..PrinterOptions::default()
            })
            .map_err(|e| LibraryError::Print(e.to_string()))?;

        Ok(output.code)
    }
}

/// Resolve framework directives the in-process pipeline understands.
fn expand_directives(source: &str) -> Result<String, LibraryError> {
    if APPLY.is_match(source) {
        return Err(LibraryError::Apply);
    }

    let mut injected = false;
    let css = BASE_DIRECTIVE.replace_all(source, |_: &regex::Captures<'_>| {
        if std::mem::replace(&mut injected, true) {
            String::new()
        } else {
            PREFLIGHT.to_string()
        }
    });
    Ok(OTHER_DIRECTIVE.replace_all(&css, "").into_owned())
}

/// `source` without any framework directive, for embedding in a generated
/// stylesheet that brings its own.
pub fn strip_directives(source: &str) -> String {
    let css = BASE_DIRECTIVE.replace_all(source, "");
    OTHER_DIRECTIVE.replace_all(&css, "").into_owned()
}

/// Class names declared in `css` that are not in `keep`.
fn unused_symbols(css: &str, keep: &IndexSet<String>) -> HashSet<String> {
    CLASS_SELECTOR
        .captures_iter(css)
        .map(|caps| caps[1].replace('\\', ""))
        .filter(|class| !keep.contains(class))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n\n.hero { color: red; }\n.legacy-banner { color: blue; }\n";

    fn keep(items: &[&str]) -> IndexSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn compile(source: &str, keep: &IndexSet<String>, minify: bool) -> Result<String, LibraryError> {
        LightningEngine::default().compile(&LibraryInput {
            source,
            filename: Path::new("tailwind.css"),
            keep,
            minify,
        })
    }

    #[test]
    fn test_expand_directives() {
        let css = expand_directives(SOURCE).unwrap();
        assert!(!css.contains("@tailwind"));
        assert!(css.contains("box-sizing: border-box"));
        assert!(css.contains(".hero"));

        let css = expand_directives("@import \"tailwindcss\";\n@import 'tailwindcss';").unwrap();
        assert_eq!(css.matches("box-sizing: border-box").count(), 1);
    }

    #[test]
    fn test_strip_directives() {
        let css = strip_directives("@import \"tailwindcss\";\n@tailwind base;\n@tailwind utilities;\n.hero { color: red; }");
        assert!(!css.contains('@'));
        assert!(css.contains(".hero { color: red; }"));
        assert!(!PREFLIGHT_BASE.contains(".flex"));
    }

    #[test]
    fn test_apply_is_refused() {
        let err = expand_directives(".btn { @apply px-4 py-2; }").unwrap_err();
        assert!(matches!(err, LibraryError::Apply));
    }

    #[test]
    fn test_unused_symbols() {
        let unused = unused_symbols(".hero{} .md\\:flex{} .card .title{}", &keep(&["hero", "md:flex"]));
        assert_eq!(unused, HashSet::from(["card".to_string(), "title".to_string()]));
    }

    #[test]
    fn test_compile_prunes_unused_classes() {
        let css = compile(SOURCE, &keep(&["hero", "flex"]), false).unwrap();

        assert!(css.contains(".hero"));
        assert!(css.contains(".flex"));
        assert!(!css.contains(".legacy-banner"));
        assert!(!css.contains(".bg-gold-light"));
        assert!(css.contains("box-sizing: border-box"));
    }

    #[test]
    fn test_compile_minified() {
        let css = compile(SOURCE, &keep(&["hero"]), true).unwrap();
        assert!(css.contains(".hero{"));
        assert!(!css.contains("\n  "));
    }
}
