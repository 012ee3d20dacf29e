//! Configuration schema definitions.
//!
//! Server settings only. Security policies are compiled in and are never
//! read from a config file.

use serde::{Deserialize, Serialize};

/// Root configuration for the docs server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Language prefixes stripped before version dispatch.
    pub languages: LanguageConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Supported content languages.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Language codes used as the first path segment (e.g., "/ja/...").
    pub codes: Vec<String>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            codes: ["en", "es", "ja", "pt", "zh", "ru", "fr", "ko", "de"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
