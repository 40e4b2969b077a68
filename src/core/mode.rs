//! Build mode selection.

/// How stylesheets are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMode {
    /// Pass `--minify` to the tool and minify in-process output.
    pub minify: bool,
}

impl BuildMode {
    /// Production mode: minified output.
    pub const PRODUCTION: Self = Self { minify: true };

    /// Development mode: readable output.
    pub const DEVELOPMENT: Self = Self { minify: false };

    /// Production when forced by the CLI or when `$env_var == "production"`.
    pub fn detect(env_var: &str, force_production: bool) -> Self {
        let from_env = std::env::var(env_var).is_ok_and(|v| v == "production");
        Self::from_flags(force_production || from_env)
    }

    pub const fn from_flags(production: bool) -> Self {
        if production {
            Self::PRODUCTION
        } else {
            Self::DEVELOPMENT
        }
    }

    #[inline]
    pub const fn is_production(&self) -> bool {
        self.minify
    }

    pub const fn label(&self) -> &'static str {
        if self.minify { "production" } else { "development" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(BuildMode::from_flags(true), BuildMode::PRODUCTION);
        assert_eq!(BuildMode::from_flags(false), BuildMode::DEVELOPMENT);
        assert_eq!(BuildMode::PRODUCTION.label(), "production");
    }

    #[test]
    fn test_detect_unset_variable_is_development() {
        let mode = BuildMode::detect("ROUTECSS_TEST_UNSET_MODE_VAR", false);
        assert!(!mode.is_production());
    }

    #[test]
    fn test_detect_forced() {
        let mode = BuildMode::detect("ROUTECSS_TEST_UNSET_MODE_VAR", true);
        assert!(mode.is_production());
    }
}
