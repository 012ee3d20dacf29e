//! Security header subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     PolicyCatalog → headers.rs (bind each policy to a BoundPolicy)
//!
//! Incoming request:
//!     → helmet.rs (CORS preface for GET/OPTIONS)
//!     → dispatch (select one policy)
//!     → BoundPolicy (run downstream, layer headers onto the response)
//! ```
//!
//! # Design Decisions
//! - Every request resolves to exactly one policy; there is no failure path
//! - Header values are computed at startup, never per request

pub mod headers;
pub mod helmet;

pub use headers::{BoundPolicy, HeaderApplicator, HeaderError};
pub use helmet::{allows_any_origin, apply, helmet_middleware, HelmetState};
