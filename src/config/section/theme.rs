//! `[theme]` section configuration.
//!
//! The table is forwarded verbatim (as JSON) into every generated tool
//! configuration. When absent, the built-in dark/gold palette is used.
//!
//! # Example
//!
//! ```toml
//! [theme.extend.colors]
//! dark = "#121212"
//! gold = "#80570d"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeConfig(pub toml::Table);

impl ThemeConfig {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The theme as a JSON value, or `None` when no theme was configured.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        if self.is_empty() {
            return None;
        }
        serde_json::to_value(&self.0).ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_theme_absent() {
        let config = test_parse_config("");
        assert!(config.theme.is_empty());
        assert!(config.theme.to_json().is_none());
    }

    #[test]
    fn test_theme_to_json() {
        let config = test_parse_config(
            "[theme.extend.colors]\nbrand = \"#ff0000\"\n\n[theme.extend.spacing]\n\"128\" = \"32rem\"",
        );
        let json = config.theme.to_json().unwrap();

        assert_eq!(json["extend"]["colors"]["brand"], "#ff0000");
        assert_eq!(json["extend"]["spacing"]["128"], "32rem");
    }
}
