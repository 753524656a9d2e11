//! Runtime environment detection.
//!
//! Single source of truth for the runtime environment, read from the
//! `HOMEGUARD_ENV` environment variable.
//!
//! # Environment Variable
//!
//! Set `HOMEGUARD_ENV` to one of:
//! - `test` - Test mode (config lives in a scratch directory)
//! - `simulator` - Running on a simulated host; push tokens are unobtainable
//! - `development` or `dev` - Development mode
//! - (anything else or unset) - Production mode

/// Runtime environment for the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment (default).
    Production,
    /// Development environment.
    Development,
    /// Test environment - config is kept out of the user's config dir.
    Test,
    /// Simulated host. Behaves like development, but the host platform
    /// reports itself as a non-physical device.
    Simulator,
}

impl Environment {
    /// Detect current environment from `HOMEGUARD_ENV`.
    #[must_use]
    pub fn current() -> Self {
        Self::parse(std::env::var("HOMEGUARD_ENV").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("test") => Self::Test,
            Some("simulator") => Self::Simulator,
            Some("development" | "dev") => Self::Development,
            _ => Self::Production,
        }
    }

    /// Returns `true` if this is the test environment.
    #[must_use]
    pub fn is_test(self) -> bool {
        self == Self::Test
    }

    /// Returns `true` if the host is simulated rather than a physical device.
    #[must_use]
    pub fn is_simulator(self) -> bool {
        self == Self::Simulator
    }

    /// Returns `true` if this is the production environment.
    #[must_use]
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
            Self::Test => write!(f, "test"),
            Self::Simulator => write!(f, "simulator"),
        }
    }
}

/// Convenience check for `HOMEGUARD_ENV=test`.
#[must_use]
pub fn is_test_mode() -> bool {
    Environment::current().is_test()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse(Some("test")), Environment::Test);
        assert_eq!(Environment::parse(Some("simulator")), Environment::Simulator);
        assert_eq!(Environment::parse(Some("dev")), Environment::Development);
        assert_eq!(Environment::parse(Some("development")), Environment::Development);
        assert_eq!(Environment::parse(Some("staging")), Environment::Production);
        assert_eq!(Environment::parse(None), Environment::Production);
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Production.to_string(), "production");
        assert_eq!(Environment::Development.to_string(), "development");
        assert_eq!(Environment::Test.to_string(), "test");
        assert_eq!(Environment::Simulator.to_string(), "simulator");
    }

    #[test]
    fn test_environment_is_methods() {
        assert!(Environment::Test.is_test());
        assert!(!Environment::Test.is_production());
        assert!(Environment::Simulator.is_simulator());
        assert!(!Environment::Development.is_simulator());
        assert!(Environment::Production.is_production());
    }
}
