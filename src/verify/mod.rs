//! Baseline-style verification of generated stylesheets.
//!
//! Every check is a plain substring search over the stylesheet text: it tells
//! whether base styles and preflight made it into an output, not whether they
//! are correct.

mod rules;

pub use rules::{ElementRules, extract_rules, print_rules};

use crate::logger::paint;
use anyhow::{Context, Result, bail};
use owo_colors::Style;
use std::fs;
use std::path::{Path, PathBuf};

/// Base style categories and the substrings each requires.
pub const BASE_CATEGORIES: &[(&str, &[&str])] = &[
    ("HTML/Body Reset", &["html", "body", "margin", "font-family"]),
    (
        "Typography Base",
        &["h1", "h2", "h3", "h4", "h5", "h6", "font-size", "font-weight", "line-height"],
    ),
    ("Link Styles", &["text-decoration", "color"]),
    ("Form Elements", &["input", "button", "textarea", "select"]),
    ("List Styles", &["ul", "ol", "li", "list-style"]),
    ("Table Styles", &["table", "border-collapse"]),
];

/// Preflight is considered present when any of these appears.
pub const PREFLIGHT_SIGNATURES: &[&str] = &[
    "*, ::before, ::after",
    "box-sizing: border-box",
    "-webkit-font-smoothing",
    "font-family: ui-sans-serif",
];

pub const UTILITY_PROBES: &[&str] = &[
    ".container", ".mx-auto", ".flex", ".grid", ".hidden", ".bg-", ".text-", ".border-",
    ".rounded", ".shadow",
];

/// Utility probes needed for a "Good" rating.
const GOOD_UTILITIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCheck {
    pub name: &'static str,
    pub found: Vec<&'static str>,
    pub missing: Vec<&'static str>,
}

impl CategoryCheck {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn total(&self) -> usize {
        self.found.len() + self.missing.len()
    }
}

/// Result of checking one stylesheet's text.
#[derive(Debug, Clone)]
pub struct Verification {
    pub categories: Vec<CategoryCheck>,
    pub preflight: Vec<(&'static str, bool)>,
    pub utilities_found: usize,
    pub lines: usize,
}

impl Verification {
    pub fn base_complete(&self) -> bool {
        self.categories.iter().all(CategoryCheck::is_complete)
    }

    pub fn preflight_present(&self) -> bool {
        self.preflight.iter().any(|(_, found)| *found)
    }

    pub fn utilities_good(&self) -> bool {
        self.utilities_found >= GOOD_UTILITIES
    }
}

pub fn verify_css(css: &str) -> Verification {
    let categories = BASE_CATEGORIES
        .iter()
        .map(|(name, checks)| {
            let (found, missing) = checks.iter().copied().partition(|check| css.contains(check));
            CategoryCheck {
                name,
                found,
                missing,
            }
        })
        .collect();

    Verification {
        categories,
        preflight: PREFLIGHT_SIGNATURES
            .iter()
            .map(|sig| (*sig, css.contains(sig)))
            .collect(),
        utilities_found: UTILITY_PROBES.iter().filter(|p| css.contains(*p)).count(),
        lines: css.split('\n').count(),
    }
}

/// A verified stylesheet on disk.
#[derive(Debug, Clone)]
pub struct FileVerification {
    pub path: PathBuf,
    pub size_kb: f64,
    pub verification: Verification,
}

/// Verify one stylesheet without printing.
#[allow(clippy::cast_precision_loss)]
pub fn inspect_file(path: &Path) -> Result<FileVerification> {
    if !path.is_file() {
        bail!("CSS file not found: {}", path.display());
    }
    let css = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(css.len() as u64);

    Ok(FileVerification {
        path: path.to_path_buf(),
        size_kb: (size as f64 / 1024.0 * 10.0).round() / 10.0,
        verification: verify_css(&css),
    })
}

/// Verify and print one stylesheet.
pub fn verify_file(path: &Path) -> Result<FileVerification> {
    let file = inspect_file(path)?;
    print_file(&file);
    Ok(file)
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifySummary {
    pub total_files: usize,
    pub complete_base: usize,
    pub with_preflight: usize,
    pub total_size_kb: f64,
}

impl VerifySummary {
    pub fn of(files: &[FileVerification]) -> Self {
        Self {
            total_files: files.len(),
            complete_base: files.iter().filter(|f| f.verification.base_complete()).count(),
            with_preflight: files.iter().filter(|f| f.verification.preflight_present()).count(),
            total_size_kb: files.iter().map(|f| f.size_kb).sum(),
        }
    }

    pub fn all_good(&self) -> bool {
        self.complete_base == self.total_files && self.with_preflight == self.total_files
    }
}

/// Verify every `*.css` file in `output_dir`. `None` when there are none.
pub fn verify_all(output_dir: &Path) -> Result<Option<VerifySummary>> {
    if !output_dir.is_dir() {
        bail!("output directory not found: {}", output_dir.display());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(output_dir)
        .with_context(|| format!("failed to read {}", output_dir.display()))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "css"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        crate::log!("warning"; "no CSS files found, run `build` first");
        return Ok(None);
    }

    crate::log!("verify"; "verifying {} CSS files", paths.len());
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let file = verify_file(path)?;
        println!("{}", paint("=".repeat(50), Style::new().dimmed()));
        files.push(file);
    }

    let summary = VerifySummary::of(&files);
    print_summary(&summary);
    Ok(Some(summary))
}

fn mark(ok: bool) -> String {
    if ok {
        paint("✓", Style::new().green())
    } else {
        paint("⚠", Style::new().yellow())
    }
}

fn print_file(file: &FileVerification) {
    let v = &file.verification;
    println!();
    println!("{} {}", paint("Base styles in", Style::new().bold()), paint(file.path.display(), Style::new().bold()));

    for category in &v.categories {
        println!(
            "  {} {}: {}/{} found",
            mark(category.is_complete()),
            category.name,
            category.found.len(),
            category.total()
        );
        if !category.is_complete() {
            println!("      missing: {}", category.missing.join(", "));
        }
    }

    println!();
    println!("  Preflight:");
    for (signature, found) in &v.preflight {
        let status = if *found { paint("found", Style::new().green()) } else { paint("missing", Style::new().red()) };
        println!("    {signature}: {status}");
    }

    println!();
    println!("  Size:      {}KB", file.size_kb);
    println!("  Lines:     {}", v.lines);
    println!("  Utilities: {}/{} probes found", v.utilities_found, UTILITY_PROBES.len());

    println!();
    println!("  Base Styles: {}", if v.base_complete() { "Complete" } else { "Incomplete" });
    println!("  Preflight:   {}", if v.preflight_present() { "Present" } else { "Missing" });
    println!("  Utilities:   {}", if v.utilities_good() { "Good" } else { "Limited" });

    if !v.preflight_present() || !v.base_complete() {
        println!();
        println!("  Recommendations:");
        if !v.preflight_present() {
            println!("    - ensure `@tailwind base;` is in the source stylesheet");
            println!("    - check that preflight is enabled in the tool config");
        }
        if !v.base_complete() {
            println!("    - run `routecss rebuild`");
        }
    }
}

fn print_summary(summary: &VerifySummary) {
    println!();
    println!("{}", paint("Verification Summary", Style::new().bold()));
    println!("  Total files:          {}", summary.total_files);
    println!("  Complete base styles: {}/{}", summary.complete_base, summary.total_files);
    println!("  Preflight present:    {}/{}", summary.with_preflight, summary.total_files);
    println!("  Total size:           {:.1}KB", summary.total_size_kb);

    if summary.all_good() {
        crate::log!("verify"; "all files have complete base styles");
    } else {
        crate::log!("warning"; "some files lack base styles or preflight, run `routecss rebuild`");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE: &str = r#"
*, ::before, ::after { box-sizing: border-box; }
html { line-height: 1.5; font-family: ui-sans-serif, system-ui; }
body { margin: 0; }
h1, h2, h3, h4, h5, h6 { font-size: inherit; font-weight: inherit; }
a { color: inherit; text-decoration: inherit; }
button, input, select, textarea { font-family: inherit; }
ol, ul, li { list-style: none; }
table { border-collapse: collapse; }
"#;

    fn category<'a>(v: &'a Verification, name: &str) -> &'a CategoryCheck {
        v.categories.iter().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn test_complete_stylesheet() {
        let v = verify_css(COMPLETE);
        assert!(v.base_complete());
        assert!(v.preflight_present());
        assert!(!v.utilities_good());
    }

    #[test]
    fn test_category_flips_with_one_substring() {
        const RESET: [&str; 4] = ["html", "body", "margin", "font-family"];
        let all = RESET.join(" ");
        assert!(category(&verify_css(&all), "HTML/Body Reset").is_complete());

        for needle in RESET {
            let css: Vec<&str> = RESET.into_iter().filter(|n| *n != needle).collect();
            let v = verify_css(&css.join(" "));
            let reset = category(&v, "HTML/Body Reset");
            assert!(!reset.is_complete(), "{needle}");
            assert_eq!(reset.missing, vec![needle]);
            assert!(!v.base_complete());
        }

        let without_margin = COMPLETE.replace("margin: 0;", "");
        let restored = format!("{without_margin}\nbody {{ margin: 0; }}");
        assert!(category(&verify_css(&restored), "HTML/Body Reset").is_complete());
    }

    #[test]
    fn test_preflight_any_signature() {
        assert!(!verify_css(".hero { color: red; }").preflight_present());
        assert!(verify_css("html { -webkit-font-smoothing: antialiased; }").preflight_present());
    }

    #[test]
    fn test_utility_rating() {
        let v = verify_css(".container{} .mx-auto{} .flex{} .grid{} .hidden{}");
        assert_eq!(v.utilities_found, 5);
        assert!(v.utilities_good());
    }

    #[test]
    fn test_embedded_preflight_verifies() {
        let v = verify_css(crate::build::PREFLIGHT);
        assert!(v.preflight_present());
        assert!(category(&v, "HTML/Body Reset").is_complete());
        assert!(category(&v, "Table Styles").is_complete());
    }

    #[test]
    fn test_inspect_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(inspect_file(&dir.path().join("nope.css")).is_err());
    }

    #[test]
    fn test_verify_all_summary() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.css"), COMPLETE).unwrap();
        fs::write(dir.path().join("about.css"), ".hero { color: red; }").unwrap();
        fs::write(dir.path().join("notes.txt"), COMPLETE).unwrap();

        let summary = verify_all(dir.path()).unwrap().unwrap();
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.complete_base, 1);
        assert_eq!(summary.with_preflight, 1);
        assert!(!summary.all_good());
    }

    #[test]
    fn test_verify_all_empty_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(verify_all(dir.path()).unwrap().is_none());
        assert!(verify_all(&dir.path().join("missing")).is_err());
    }
}
