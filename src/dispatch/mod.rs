//! Version dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → request.rs (strip language prefix, extract requested version)
//!     → table.rs (ordered rules over RequestFacts)
//!     → version.rs (numeric range checks)
//!     → Return: exactly one PolicyName
//! ```
//!
//! # Design Decisions
//! - Rules are data, evaluated in declaration order; first match wins
//! - The table is total: no match selects the default policy
//! - A request without a version fails every version condition
//! - Collaborator behavior sits behind traits so it can be swapped in tests

pub mod dispatcher;
pub mod request;
pub mod table;
pub mod version;

pub use dispatcher::Dispatcher;
pub use request::{EnterprisePathVersions, LanguageCodes, LanguagePrefix, RequestedVersion, VersionSource};
pub use table::{Condition, DispatchRule, DispatchTable, RequestFacts, Selection};
pub use version::{ReleaseRanges, ReleaseVersion, VersionIdentifier, VersionRange, VersionRanges};
