//! Security headers for a versioned documentation site.
//!
//! Each request is served with one of four Content-Security-Policy
//! configurations. Current docs get the strict baseline; archived enterprise
//! snapshots get the baseline widened with the sources they were built for.
//!
//! ```text
//! Request → CORS (GET/OPTIONS) → dispatch (version + path) → bound policy → headers
//! ```

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod policy;
pub mod security;

pub use config::{Environment, ServerConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use policy::{PolicyCatalog, PolicyName};
pub use security::HelmetState;
