//! Build tiers, tried in order until one produces a stylesheet.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// External CSS tool scanning the probe document.
    PrimaryTool,
    /// In-process pipeline over the base stylesheet.
    FallbackLibrary,
    /// The base stylesheet copied verbatim.
    BaselineCopy,
}

impl Tier {
    pub const CHAIN: [Self; 3] = [Self::PrimaryTool, Self::FallbackLibrary, Self::BaselineCopy];

    pub const fn name(self) -> &'static str {
        match self {
            Self::PrimaryTool => "primary-tool",
            Self::FallbackLibrary => "fallback-library",
            Self::BaselineCopy => "baseline-copy",
        }
    }

    /// Tier tried after this one fails.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PrimaryTool => Some(Self::FallbackLibrary),
            Self::FallbackLibrary => Some(Self::BaselineCopy),
            Self::BaselineCopy => None,
        }
    }

    /// Whether the output was narrowed to the route's classes.
    pub const fn is_targeted(self) -> bool {
        !matches!(self, Self::BaselineCopy)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_order_follows_next() {
        let mut tier = Some(Tier::CHAIN[0]);
        let mut walked = Vec::new();
        while let Some(t) = tier {
            walked.push(t);
            tier = t.next();
        }
        assert_eq!(walked, Tier::CHAIN);
    }

    #[test]
    fn test_serialized_names() {
        for tier in Tier::CHAIN {
            assert_eq!(
                serde_json::to_string(&tier).unwrap(),
                format!("\"{}\"", tier.name())
            );
        }
    }
}
