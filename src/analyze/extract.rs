//! Class extraction from template text.
//!
//! Extraction is a best-effort static scan over raw text: templates are never
//! rendered. Four independent heuristics are unioned, so the result can both
//! over- and under-approximate what the rendered page uses:
//!
//! 1. `class="..."` attributes, split on whitespace
//! 2. utility shapes anywhere in the text ([`search_utilities`])
//! 3. `style="..."` declarations with a utility equivalent (`display: flex`)
//! 4. `{{ ... class ... }}` expressions, keeping tokens that classify as utilities
//!
//! Results keep discovery order, which makes persisted manifests stable.

use super::patterns::{is_utility_class, search_utilities};
use crate::log;
use indexmap::IndexSet;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)class\s*=\s*["']([^"']+)["']"#).unwrap());

static STYLE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)style\s*=\s*["']([^"']+)["']"#).unwrap());

static CLASS_EXPR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{\{[^}]*class[^}]*\}\}").unwrap());

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\w-]+").unwrap());

/// Inline declarations with a utility-class equivalent.
const STYLE_EQUIVALENTS: &[(&str, &str)] = &[
    ("display: flex", "flex"),
    ("display: grid", "grid"),
    ("display: block", "block"),
    ("display: none", "hidden"),
];

/// Extract every class-like token referenced by `text`.
pub fn extract_classes(text: &str) -> IndexSet<String> {
    let mut classes = attribute_classes(text);

    classes.extend(search_utilities(text).map(str::to_owned));

    for caps in STYLE_ATTR.captures_iter(text) {
        let style = &caps[1];
        for (declaration, class) in STYLE_EQUIVALENTS {
            if style.contains(declaration) {
                classes.insert((*class).to_owned());
            }
        }
    }

    for expr in CLASS_EXPR.find_iter(text) {
        let inner = expr.as_str().replace(['{', '}'], "");
        classes.extend(
            WORD.find_iter(&inner)
                .map(|m| m.as_str())
                .filter(|token| is_utility_class(token))
                .map(str::to_owned),
        );
    }

    classes
}

/// Tokens of every `class="..."` / `class='...'` attribute in `text`.
pub fn attribute_classes(text: &str) -> IndexSet<String> {
    CLASS_ATTR
        .captures_iter(text)
        .flat_map(|caps| {
            caps[1]
                .split_whitespace()
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Classes found in one template file.
#[derive(Debug, Clone)]
pub struct FileScan {
    pub path: PathBuf,
    pub classes: IndexSet<String>,
}

/// Read and extract one template.
///
/// A missing or unreadable file is logged and yields an empty set.
pub fn scan_file(path: &Path) -> FileScan {
    let classes = match std::fs::read(path) {
        Ok(bytes) => extract_classes(&String::from_utf8_lossy(&bytes)),
        Err(e) => {
            log!("warning"; "cannot read {}: {}", path.display(), e);
            IndexSet::new()
        }
    };

    FileScan {
        path: path.to_path_buf(),
        classes,
    }
}

/// A class set split into utility and custom classes (discovery order kept).
#[derive(Debug, Default)]
pub struct ClassBreakdown<'a> {
    pub utility: Vec<&'a str>,
    pub custom: Vec<&'a str>,
}

impl<'a> ClassBreakdown<'a> {
    pub fn of<I>(classes: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let (utility, custom) = classes
            .into_iter()
            .map(String::as_str)
            .partition(|class| is_utility_class(class));
        Self { utility, custom }
    }
}
