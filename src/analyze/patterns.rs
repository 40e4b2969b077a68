//! Utility-class pattern tables.
//!
//! Two tables with different jobs:
//!
//! - [`SEARCH_PATTERNS`]: unanchored shapes found anywhere in raw template
//!   text (class names hidden inside template expressions).
//! - [`UTILITY_TABLE`]: anchored shapes deciding whether a single token is a
//!   utility class (template-expression filtering, size estimates, reports).
//!
//! The utility table is maintained by hand and is not derived from the CSS
//! tool's own configuration, so it can drift from the utilities the tool
//! actually generates. Bump [`UTILITY_TABLE_VERSION`] whenever it changes so
//! manifests written with an older table can be told apart.

use regex::{Regex, RegexSet};
use std::sync::LazyLock;

/// Revision of [`UTILITY_TABLE`].
pub const UTILITY_TABLE_VERSION: u32 = 1;

/// Utility shapes searched for in raw template text.
pub const SEARCH_PATTERNS: &[&str] = &[
    r"\b(?:bg|text|border|p|px|py|pt|pb|pl|pr|m|mx|my|mt|mb|ml|mr|w|h|min|max)-[\w-]+",
    r"\b(?:flex|grid|block|inline|hidden|relative|absolute|fixed|static)\b",
    r"\b(?:rounded|shadow|opacity|transform|transition|duration|ease)-[\w-]+",
    r"\b(?:hover|focus|active|disabled|first|last|odd|even):[\w-]+",
    r"\b(?:sm|md|lg|xl|2xl):[\w-]+",
    r"\b(?:top|bottom|left|right|inset|z)-[\w-]+",
    r"\b(?:overflow|font|leading|tracking|text|align)-[\w-]+",
    r"\b(?:space|divide|gap|justify|items|content|self|order)-[\w-]+",
    r"\b(?:col|row|span)-[\w-]+",
    r"\b(?:container|sr-only)\b",
];

/// Anchored utility-class classification table.
pub const UTILITY_TABLE: &[&str] = &[
    // layout
    r"^(?:bg|text|border|p|px|py|pt|pb|pl|pr|m|mx|my|mt|mb|ml|mr|w|h|min|max)-",
    r"^(?:flex|grid|block|inline|inline-block|hidden|relative|absolute|fixed|static|sticky)$",
    // styling
    r"^(?:rounded|shadow|opacity|transform|transition|duration|ease)-",
    r"^(?:font|leading|tracking|text|align)-",
    r"^(?:border|outline|ring)-",
    // state variants
    r"^(?:hover|focus|active|disabled|first|last|odd|even|group-hover|group-focus):",
    // responsive
    r"^(?:sm|md|lg|xl|2xl):",
    // positioning and spacing
    r"^(?:top|bottom|left|right|inset|z)-",
    r"^(?:space|divide|gap|justify|items|content|self|order)-",
    r"^(?:overflow|resize|cursor|select|pointer)-",
    // grid and flex
    r"^(?:col|row|span|place|auto)-",
    r"^(?:flex|grid|justify|items|content|self|place)-",
    // palette colors
    r"^(?:bg|text|border|placeholder|ring|divide)-(?:current|transparent|black|white|gray|red|yellow|green|blue|indigo|purple|pink)-",
    // project colors
    r"^(?:bg|text|border)-(?:dark|gold)",
    // special utilities
    r"^(?:container|sr-only|not-sr-only|appearance-none|list-none)$",
    // animation and transforms
    r"^(?:animate|scale|rotate|translate|skew|origin)-",
    // filters and effects
    r"^(?:filter|blur|brightness|contrast|grayscale|hue|invert|saturate|sepia|backdrop)-",
    // typography
    r"^(?:prose|antialiased|subpixel-antialiased|italic|not-italic|font|text|leading|tracking|decoration|underline|overline|line-through|no-underline)$",
    r"^(?:uppercase|lowercase|capitalize|normal-case)$",
    // visibility
    r"^(?:visible|invisible|opacity|scale|rotate|translate)$",
    // forms
    r"^(?:form|resize|appearance)$",
];

static SEARCH: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SEARCH_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

static UTILITY: LazyLock<RegexSet> = LazyLock::new(|| RegexSet::new(UTILITY_TABLE).unwrap());

/// Whether `name` has the shape of a utility class.
#[inline]
pub fn is_utility_class(name: &str) -> bool {
    UTILITY.is_match(name)
}

/// Every utility-shaped match in `text`, pattern by pattern.
pub fn search_utilities(text: &str) -> impl Iterator<Item = &str> {
    SEARCH
        .iter()
        .flat_map(move |re| re.find_iter(text).map(|m| m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_compile() {
        assert_eq!(SEARCH.len(), SEARCH_PATTERNS.len());
        assert_eq!(UTILITY.len(), UTILITY_TABLE.len());
    }

    #[test]
    fn test_utility_classes() {
        for class in [
            "bg-blue-500",
            "px-4",
            "flex",
            "inline-block",
            "hover:underline",
            "md:grid-cols-3",
            "group-hover:text-white",
            "z-10",
            "col-span-2",
            "bg-gold-light",
            "text-dark",
            "sr-only",
            "uppercase",
            "animate-spin",
            "backdrop-blur",
            "italic",
        ] {
            assert!(is_utility_class(class), "{class} should be a utility");
        }
    }

    #[test]
    fn test_custom_classes() {
        for class in ["hero", "card", "navbar-brand", "btn-primary", "transition", "shadow"] {
            assert!(!is_utility_class(class), "{class} should be custom");
        }
    }

    #[test]
    fn test_anchoring() {
        // prefix table entries need the dash
        assert!(!is_utility_class("bg"));
        // exact-match entries reject suffixes
        assert!(!is_utility_class("flexbox"));
        assert!(!is_utility_class("containers"));
    }

    #[test]
    fn test_search_finds_utilities_in_expressions() {
        let text = r#"{% set cls = "md:flex bg-gray-100 hover:text-gold" %}"#;
        let found: Vec<_> = search_utilities(text).collect();
        assert!(found.contains(&"md:flex"));
        assert!(found.contains(&"bg-gray-100"));
        assert!(found.contains(&"hover:text-gold"));
        assert!(found.contains(&"flex"));
    }

    #[test]
    fn test_search_ignores_plain_prose() {
        let found: Vec<_> = search_utilities("Welcome to our pricing page").collect();
        assert!(found.is_empty());
    }
}
