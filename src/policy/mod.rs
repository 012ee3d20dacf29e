//! Policy catalog subsystem.
//!
//! # Data Flow
//! ```text
//! Environment (read once at startup)
//!     → configuration.rs (baseline policy)
//!     → catalog.rs (baseline + append-only widenings for archived eras)
//!     → PolicyCatalog (immutable, shared by all requests)
//! ```
//!
//! # Design Decisions
//! - Variants are derived with `widen`, which only appends sources
//! - No per-request mutation; the catalog is never rebuilt
//! - Directive order is fixed by `Directive` declaration order

pub mod catalog;
pub mod configuration;
pub mod directive;

pub use catalog::{PolicyCatalog, PolicyName};
pub use configuration::{widen, DirectiveSources, PolicyConfiguration, ReferrerPolicy, Widening};
pub use directive::{Directive, SourceToken};
