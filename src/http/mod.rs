//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → security::helmet (CORS + per-version security headers)
//!     → docs handler
//!     → Send to client
//! ```

pub mod server;

pub use server::HttpServer;
