//! Analysis report printed after `analyze`.

use super::extract::ClassBreakdown;
use super::scan::ScanOutcome;
use crate::logger::paint;
use crate::manifest::Manifest;
use crate::report::ORIGINAL_SIZE_KB;
use owo_colors::Style;

/// Utilities shown per route by [`print_class_listing`].
const LISTED_UTILITIES: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub pages: usize,
    pub includes: usize,
    pub include_classes: usize,
    pub max_classes: usize,
    pub total_size_kb: f64,
    pub average_size_kb: f64,
    pub savings_kb: f64,
    pub savings_percent: f64,
}

impl AnalysisSummary {
    #[allow(clippy::cast_precision_loss)]
    pub fn of(outcome: &ScanOutcome) -> Self {
        let pages = &outcome.manifest.pages;
        let total_size_kb: f64 = pages.values().map(|p| p.estimated_size_kb).sum();
        let average_size_kb = if pages.is_empty() {
            0.0
        } else {
            total_size_kb / pages.len() as f64
        };
        let savings_kb = ORIGINAL_SIZE_KB - total_size_kb;

        Self {
            pages: pages.len(),
            includes: outcome.include_count,
            include_classes: outcome.shared.len(),
            max_classes: pages.values().map(|p| p.total_classes).max().unwrap_or(0),
            total_size_kb,
            average_size_kb,
            savings_kb,
            savings_percent: savings_kb / ORIGINAL_SIZE_KB * 100.0,
        }
    }

    pub fn print(&self, manifest: &Manifest) {
        println!();
        println!("{}", paint("Analysis Report", Style::new().bold()));
        println!("  Total Pages:          {}", self.pages);
        println!("  Includes:             {}", self.includes);
        println!("  Include Classes:      {}", self.include_classes);
        println!("  Max Classes per Page: {}", self.max_classes);
        println!("  Average CSS Size:     {:.1}KB", self.average_size_kb);
        println!("  Total Optimized Size: {:.1}KB", self.total_size_kb);
        println!(
            "  Estimated Savings:    {:.1}KB ({:.1}%)",
            self.savings_kb, self.savings_percent
        );

        if manifest.is_empty() {
            return;
        }

        println!();
        println!("{}", paint("Per-Route Breakdown", Style::new().bold()));
        for entry in manifest.pages.values() {
            let breakdown = ClassBreakdown::of(&entry.classes);
            println!("  {}.css:", paint(&entry.route, Style::new().cyan()));
            println!("    Total Classes:  {}", entry.total_classes);
            println!(
                "    Utility: {}, Custom: {}",
                breakdown.utility.len(),
                breakdown.custom.len()
            );
            println!("    Estimated Size: {}KB", entry.estimated_size_kb);
        }
    }
}

/// Print every detected class per route.
pub fn print_class_listing(manifest: &Manifest) {
    println!();
    println!("{}", paint("Detected Classes", Style::new().bold()));

    for entry in manifest.pages.values() {
        println!();
        println!("  {}.css ({} classes):", paint(&entry.route, Style::new().cyan()), entry.classes.len());

        let breakdown = ClassBreakdown::of(&entry.classes);
        if let Some(line) = utility_line(&breakdown.utility) {
            println!("    {line}");
        }
        if !breakdown.custom.is_empty() {
            println!(
                "    Custom ({}): {}",
                breakdown.custom.len(),
                breakdown.custom.join(", ")
            );
        }
    }
}

fn utility_line(utility: &[&str]) -> Option<String> {
    if utility.is_empty() {
        return None;
    }
    let shown = &utility[..utility.len().min(LISTED_UTILITIES)];
    let more = if utility.len() > LISTED_UTILITIES { "..." } else { "" };
    Some(format!(
        "Utility ({}): {}{}",
        utility.len(),
        shown.join(", "),
        more
    ))
}
