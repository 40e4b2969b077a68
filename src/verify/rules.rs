//! Base element rules found in a stylesheet.

use anyhow::{Context, Result, bail};
use regex::Regex;
use std::path::Path;

/// Elements whose rules are listed.
pub const BASE_ELEMENTS: &[&str] = &["html", "body", "h1", "h2", "h3", "p", "a", "button", "input"];

const SHOWN_RULES: usize = 3;
const MAX_RULE_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRules {
    pub element: &'static str,
    /// First rules, whitespace-collapsed and truncated.
    pub shown: Vec<String>,
    pub total: usize,
}

/// Rules targeting each of [`BASE_ELEMENTS`].
pub fn extract_rules(css: &str) -> Vec<ElementRules> {
    BASE_ELEMENTS
        .iter()
        .map(|element| {
            let Ok(re) = Regex::new(&format!(r"(?m)(?:^|\s){element}(?:\s*,|\s*\{{)[^}}]*\}}")) else {
                return ElementRules { element, shown: Vec::new(), total: 0 };
            };
            let matches: Vec<&str> = re.find_iter(css).map(|m| m.as_str()).collect();
            ElementRules {
                element,
                shown: matches.iter().take(SHOWN_RULES).map(|m| clean_rule(m)).collect(),
                total: matches.len(),
            }
        })
        .collect()
}

fn clean_rule(rule: &str) -> String {
    let collapsed = rule.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut cleaned: String = collapsed.chars().take(MAX_RULE_CHARS).collect();
    if cleaned.chars().count() >= MAX_RULE_CHARS {
        cleaned.push_str("...");
    }
    cleaned
}

/// Print base element rules of the stylesheet at `path`.
pub fn print_rules(path: &Path) -> Result<Vec<ElementRules>> {
    if !path.is_file() {
        bail!("CSS file not found: {}", path.display());
    }
    let css = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let rules = extract_rules(&css);

    let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    crate::log!("verify"; "base rules in {}", name);
    for element in &rules {
        println!();
        if element.total == 0 {
            println!("{}: no rules found", element.element);
            continue;
        }
        println!("{}:", element.element);
        for rule in &element.shown {
            println!("   {rule}");
        }
        if element.total > SHOWN_RULES {
            println!("   ... and {} more rules", element.total - SHOWN_RULES);
        }
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules_for<'a>(rules: &'a [ElementRules], element: &str) -> &'a ElementRules {
        rules.iter().find(|r| r.element == element).unwrap()
    }

    #[test]
    fn test_extract_rules() {
        let css = "html {\n  line-height: 1.5;\n}\nbody { margin: 0; }\nh1, h2 { font-size: inherit; }\n";
        let rules = extract_rules(css);

        assert_eq!(rules_for(&rules, "html").shown, vec!["html { line-height: 1.5; }"]);
        assert_eq!(rules_for(&rules, "body").total, 1);
        assert_eq!(rules_for(&rules, "h1").shown, vec!["h1, h2 { font-size: inherit; }"]);
        assert_eq!(rules_for(&rules, "input").total, 0);
    }

    #[test]
    fn test_extract_rules_limits_and_truncates() {
        let long = format!("p {{ {} }}", "color: red; ".repeat(20));
        let css = format!("{long}\np {{ margin: 0; }}\np {{ padding: 0; }}\np {{ color: blue; }}\n");
        let p = rules_for(&extract_rules(&css), "p").clone();

        assert_eq!(p.total, 4);
        assert_eq!(p.shown.len(), 3);
        assert!(p.shown[0].ends_with("..."));
        assert_eq!(p.shown[0].chars().count(), 103);
        assert_eq!(p.shown[1], "p { margin: 0; }");
    }

    #[test]
    fn test_class_selectors_not_matched_as_elements() {
        let rules = extract_rules(".button-primary { color: red; }\n");
        assert_eq!(rules_for(&rules, "button").total, 0);
    }
}
