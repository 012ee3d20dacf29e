//! Process environment read once at startup.
//!
//! `APP_ENV` selects the runtime mode and `SUPPORT_PORTAL_URL` points the
//! support iframe at a non-production portal.

use url::Url;

use crate::policy::SourceToken;

pub const MODE_VAR: &str = "APP_ENV";
/// Must hold a full URL (scheme included); bare host sources are ignored.
pub const SUPPORT_PORTAL_VAR: &str = "SUPPORT_PORTAL_URL";

const PRODUCTION_SUPPORT_PORTAL: &str = "https://support.github.com";

/// Runtime mode of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Production,
    Test,
    Other(String),
}

impl RuntimeMode {
    pub fn parse(value: &str) -> Self {
        match value {
            "development" => RuntimeMode::Development,
            "production" => RuntimeMode::Production,
            "test" => RuntimeMode::Test,
            other => RuntimeMode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RuntimeMode::Development => "development",
            RuntimeMode::Production => "production",
            RuntimeMode::Test => "test",
            RuntimeMode::Other(other) => other,
        }
    }
}

/// Environment-derived inputs to catalog construction.
#[derive(Debug, Clone)]
pub struct Environment {
    mode: RuntimeMode,
    support_portal_url: Option<String>,
}

impl Environment {
    pub fn new(mode: RuntimeMode, support_portal_url: Option<String>) -> Self {
        Self {
            mode,
            support_portal_url,
        }
    }

    /// Read the process environment. Unset variables are treated as empty.
    pub fn from_env() -> Self {
        let mode = std::env::var(MODE_VAR).unwrap_or_default();
        Self::new(
            RuntimeMode::parse(&mode),
            std::env::var(SUPPORT_PORTAL_VAR).ok(),
        )
    }

    /// Runtime mode read at startup.
    pub fn mode(&self) -> &RuntimeMode {
        &self.mode
    }

    pub fn is_development(&self) -> bool {
        self.mode == RuntimeMode::Development
    }

    pub fn is_production(&self) -> bool {
        self.mode == RuntimeMode::Production
    }

    /// Origin allowed to frame the support portal.
    ///
    /// Outside production an unset, empty or unparsable URL yields `None`.
    pub fn support_portal_source(&self) -> Option<SourceToken> {
        if self.is_production() {
            return Some(SourceToken::from_static(PRODUCTION_SUPPORT_PORTAL));
        }

        let raw = self.support_portal_url.as_deref().map(str::trim)?;
        if raw.is_empty() {
            return None;
        }

        match Url::parse(raw) {
            Ok(_) => Some(SourceToken::from(raw.to_string())),
            Err(e) => {
                tracing::warn!(
                    url = %raw,
                    error = %e,
                    "Ignoring malformed {}",
                    SUPPORT_PORTAL_VAR
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(RuntimeMode::parse("development"), RuntimeMode::Development);
        assert_eq!(RuntimeMode::parse("production"), RuntimeMode::Production);
        assert_eq!(RuntimeMode::parse(""), RuntimeMode::Other(String::new()));
        assert_eq!(RuntimeMode::parse("staging").as_str(), "staging");
    }

    #[test]
    fn test_production_ignores_configured_portal() {
        let env = Environment::new(
            RuntimeMode::Production,
            Some("http://localhost:4000".to_string()),
        );
        assert_eq!(
            env.support_portal_source(),
            Some(SourceToken::from("https://support.github.com"))
        );
    }

    #[test]
    fn test_portal_elided_when_unset_empty_or_malformed() {
        for value in [None, Some(""), Some("   "), Some("not a url")] {
            let env = Environment::new(RuntimeMode::Development, value.map(String::from));
            assert_eq!(env.support_portal_source(), None, "{:?}", value);
        }
    }

    #[test]
    fn test_bare_host_portal_is_ignored() {
        let env = Environment::new(RuntimeMode::Test, Some("support.localhost".to_string()));
        assert_eq!(env.support_portal_source(), None);
    }

    #[test]
    fn test_portal_kept_when_valid() {
        let env = Environment::new(
            RuntimeMode::Test,
            Some("https://support.example.test".to_string()),
        );
        assert_eq!(
            env.support_portal_source(),
            Some(SourceToken::from("https://support.example.test"))
        );
        assert!(!env.is_development());
    }
}
