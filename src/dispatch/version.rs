//! Release versions and range predicates.
//!
//! Versions are compared numerically by component, never lexically:
//! `2.9 < 2.12`. Missing components count as zero.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// A requested product version as it appears in a request path (e.g. "2.15").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VersionIdentifier(String);

impl VersionIdentifier {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Range check used by the dispatcher.
pub trait VersionRanges: Send + Sync {
    /// True when `version` falls inside `range_expr` (e.g. "<=2.18").
    fn satisfies_range(&self, version: &VersionIdentifier, range_expr: &str) -> bool;
}

/// Numeric `major.minor.patch` release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ReleaseVersion {
    /// Parse `X`, `X.Y` or `X.Y.Z`. Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().map(str::parse).transpose().ok()?.unwrap_or(0);
        let patch = parts.next().map(str::parse).transpose().ok()?.unwrap_or(0);
        if parts.next().is_some() {
            return None;
        }
        Some(Self { major, minor, patch })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Comparator {
    op: Op,
    bound: ReleaseVersion,
}

impl Comparator {
    fn parse(s: &str) -> Option<Self> {
        let (op, rest) = if let Some(rest) = s.strip_prefix("<=") {
            (Op::Le, rest)
        } else if let Some(rest) = s.strip_prefix(">=") {
            (Op::Ge, rest)
        } else if let Some(rest) = s.strip_prefix('<') {
            (Op::Lt, rest)
        } else if let Some(rest) = s.strip_prefix('>') {
            (Op::Gt, rest)
        } else if let Some(rest) = s.strip_prefix('=') {
            (Op::Eq, rest)
        } else {
            (Op::Eq, s)
        };

        Some(Self {
            op,
            bound: ReleaseVersion::parse(rest.trim())?,
        })
    }

    fn matches(&self, version: ReleaseVersion) -> bool {
        let ord = version.cmp(&self.bound);
        match self.op {
            Op::Lt => ord == Ordering::Less,
            Op::Le => ord != Ordering::Greater,
            Op::Gt => ord == Ordering::Greater,
            Op::Ge => ord != Ordering::Less,
            Op::Eq => ord == Ordering::Equal,
        }
    }
}

/// A conjunction of comparators, e.g. `">2.12 <=2.19"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    comparators: Vec<Comparator>,
}

impl VersionRange {
    /// Parse a space-separated list of comparators. Empty or malformed is `None`.
    pub fn parse(expr: &str) -> Option<Self> {
        let comparators = expr
            .split_whitespace()
            .map(Comparator::parse)
            .collect::<Option<Vec<_>>>()?;
        if comparators.is_empty() {
            return None;
        }
        Some(Self { comparators })
    }

    pub fn contains(&self, version: ReleaseVersion) -> bool {
        self.comparators.iter().all(|c| c.matches(version))
    }
}

/// Default range check over numeric release versions.
///
/// A version or range that does not parse never satisfies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseRanges;

impl VersionRanges for ReleaseRanges {
    fn satisfies_range(&self, version: &VersionIdentifier, range_expr: &str) -> bool {
        let Some(version) = ReleaseVersion::parse(version.as_str()) else {
            return false;
        };
        match VersionRange::parse(range_expr) {
            Some(range) => range.contains(version),
            None => {
                tracing::warn!(range = %range_expr, "Unparsable version range");
                false
            }
        }
    }
}
