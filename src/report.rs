//! Build report: per-route results and size savings.

use crate::build::Tier;
use crate::log;
use crate::logger::paint;
use crate::utils::date::DateTimeUtc;
use owo_colors::Style;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Size of the unoptimized utility stylesheet routes are compared against.
pub const ORIGINAL_SIZE_KB: f64 = 2800.0;

/// One generated stylesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    pub route: String,
    pub output_path: PathBuf,
    /// Bytes.
    pub size: u64,
    #[serde(rename = "sizeKB")]
    pub size_kb: f64,
    /// Classes targeted; 0 for a baseline copy.
    pub class_count: usize,
    pub tier: Tier,
}

impl BuildResult {
    pub fn new(
        route: impl Into<String>,
        output_path: PathBuf,
        size: u64,
        class_count: usize,
        tier: Tier,
    ) -> Self {
        Self {
            route: route.into(),
            output_path,
            size,
            size_kb: kb_one_decimal(size),
            class_count: if tier.is_targeted() { class_count } else { 0 },
            tier,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn kb_one_decimal(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    pub files_generated: usize,
    #[serde(rename = "totalSizeKB")]
    pub total_size_kb: f64,
    #[serde(rename = "averageSizeKB")]
    pub average_size_kb: f64,
    #[serde(rename = "originalSizeKB")]
    pub original_size_kb: f64,
    #[serde(rename = "savingsKB")]
    pub savings_kb: f64,
    pub savings_percent: f64,
    pub compression_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub timestamp: String,
    pub build_results: Vec<BuildResult>,
    pub summary: BuildSummary,
}

impl BuildReport {
    /// Summarize `results`; `None` when nothing was generated.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_results(results: &[BuildResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let total_size_kb: f64 = results.iter().map(|r| r.size_kb).sum();
        let savings_kb = ORIGINAL_SIZE_KB - total_size_kb;
        let compression_ratio = if total_size_kb > 0.0 {
            ORIGINAL_SIZE_KB / total_size_kb
        } else {
            0.0
        };

        Some(Self {
            timestamp: DateTimeUtc::now().to_rfc3339(),
            build_results: results.to_vec(),
            summary: BuildSummary {
                files_generated: results.len(),
                total_size_kb,
                average_size_kb: total_size_kb / results.len() as f64,
                original_size_kb: ORIGINAL_SIZE_KB,
                savings_kb,
                savings_percent: savings_kb / ORIGINAL_SIZE_KB * 100.0,
                compression_ratio,
            },
        })
    }

    pub fn print(&self) {
        println!();
        println!("{}", paint("Build Results", Style::new().bold()));
        for result in &self.build_results {
            let tier = format!("[{}]", result.tier);
            println!(
                "  {}.css: {}KB ({} classes) {}",
                result.route,
                result.size_kb,
                result.class_count,
                if result.tier == Tier::PrimaryTool {
                    paint(tier, Style::new().dimmed())
                } else {
                    paint(tier, Style::new().yellow())
                }
            );
        }

        let s = &self.summary;
        println!();
        println!("{}", paint("Summary", Style::new().bold()));
        println!("  Files Generated:   {}", s.files_generated);
        println!("  Total Size:        {:.1}KB", s.total_size_kb);
        println!("  Average Size:      {:.1}KB", s.average_size_kb);
        println!("  Original Size:     {:.0}KB", s.original_size_kb);
        println!(
            "  Total Savings:     {:.1}KB ({:.1}%)",
            s.savings_kb, s.savings_percent
        );
        println!("  Compression Ratio: {:.1}x smaller", s.compression_ratio);
    }

    /// Write the report as pretty JSON. Failures are logged, never returned.
    pub fn save(&self, path: &Path) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(e) => {
                log!("warning"; "cannot serialize build report: {}", e);
                return;
            }
        };
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            log!("warning"; "cannot create {}: {}", parent.display(), e);
            return;
        }
        match std::fs::write(path, json) {
            Ok(()) => crate::debug!("build"; "report saved to {}", path.display()),
            Err(e) => log!("warning"; "cannot write {}: {}", path.display(), e),
        }
    }
}

/// Print and persist the report for `results`.
pub fn publish(results: &[BuildResult], path: &Path) -> Option<BuildReport> {
    let Some(report) = BuildReport::from_results(results) else {
        log!("error"; "no CSS files were generated");
        return None;
    };
    report.print();
    report.save(path);
    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(route: &str, size: u64, tier: Tier) -> BuildResult {
        BuildResult::new(route, PathBuf::from(format!("_site/css/{route}.css")), size, 12, tier)
    }

    #[test]
    fn test_size_kb_one_decimal() {
        assert_eq!(result("a", 2560, Tier::PrimaryTool).size_kb, 2.5);
        assert_eq!(result("a", 1100, Tier::PrimaryTool).size_kb, 1.1);
        assert_eq!(result("a", 0, Tier::PrimaryTool).size_kb, 0.0);
    }

    #[test]
    fn test_baseline_copy_has_no_classes() {
        assert_eq!(result("a", 2048, Tier::BaselineCopy).class_count, 0);
        assert_eq!(result("a", 2048, Tier::FallbackLibrary).class_count, 12);
    }

    #[test]
    fn test_empty_results() {
        assert!(BuildReport::from_results(&[]).is_none());
    }

    #[test]
    fn test_summary_maths() {
        let report = BuildReport::from_results(&[
            result("index", 10 * 1024, Tier::PrimaryTool),
            result("about", 4 * 1024, Tier::PrimaryTool),
        ])
        .unwrap();
        let s = &report.summary;

        assert_eq!(s.files_generated, 2);
        assert_eq!(s.total_size_kb, 14.0);
        assert_eq!(s.average_size_kb, 7.0);
        assert_eq!(s.original_size_kb, 2800.0);
        assert_eq!(s.savings_kb, 2786.0);
        assert!((s.savings_percent - 99.5).abs() < 1e-9);
        assert_eq!(s.compression_ratio, 200.0);
    }

    #[test]
    fn test_save_writes_camel_case_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/css-build-report.json");
        let report = BuildReport::from_results(&[result("index", 2048, Tier::FallbackLibrary)]).unwrap();

        report.save(&path);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["buildResults"][0]["sizeKB"], 2.0);
        assert_eq!(json["buildResults"][0]["tier"], "fallback-library");
        assert_eq!(json["buildResults"][0]["outputPath"], "_site/css/index.css");
        assert_eq!(json["summary"]["filesGenerated"], 1);
        assert!(json["summary"]["compressionRatio"].is_number());
    }

    #[test]
    fn test_save_never_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let report = BuildReport::from_results(&[result("index", 2048, Tier::PrimaryTool)]).unwrap();

        // parent is a regular file: logged, not returned
        report.save(&blocker.join("report.json"));
    }
}
