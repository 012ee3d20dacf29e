//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!
//! process environment (APP_ENV, SUPPORT_PORTAL_URL)
//!     → environment.rs (read once)
//!     → Environment → policy catalog construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Environment is passed explicitly instead of read inside the catalog

pub mod environment;
pub mod loader;
pub mod schema;
pub mod validation;

pub use environment::{Environment, RuntimeMode};
pub use loader::{load_config, ConfigError};
pub use schema::{LanguageConfig, ListenerConfig, ObservabilityConfig, ServerConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
