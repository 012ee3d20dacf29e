//! Ordered dispatch rules mapping request facts to a catalog policy.

use serde::Serialize;

use crate::dispatch::version::{VersionIdentifier, VersionRanges};
use crate::policy::PolicyName;

/// Facts about a request that the rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFacts {
    pub requested_version: Option<VersionIdentifier>,
    /// Request path with any language prefix removed.
    pub stripped_path: String,
}

impl RequestFacts {
    pub fn new(requested_version: Option<VersionIdentifier>, stripped_path: impl Into<String>) -> Self {
        Self {
            requested_version,
            stripped_path: stripped_path.into(),
        }
    }

    /// Pages imported from the old developer site live under
    /// `/enterprise/{version}/developer`.
    pub fn is_developer_legacy_path(&self) -> bool {
        let Some(version) = &self.requested_version else {
            return false;
        };
        self.stripped_path
            .strip_prefix("/enterprise/")
            .and_then(|rest| rest.strip_prefix(version.as_str()))
            .is_some_and(|rest| rest.starts_with("/developer"))
    }
}

/// A single test within a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// The requested version is inside the range expression.
    VersionSatisfies(&'static str),
    /// The path is under `/enterprise/{version}/developer`.
    DeveloperLegacyPath,
}

impl Condition {
    fn holds(&self, facts: &RequestFacts, ranges: &dyn VersionRanges) -> bool {
        match self {
            Condition::VersionSatisfies(range) => facts
                .requested_version
                .as_ref()
                .is_some_and(|v| ranges.satisfies_range(v, range)),
            Condition::DeveloperLegacyPath => facts.is_developer_legacy_path(),
        }
    }
}

/// Selects `policy` when every condition holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRule {
    pub label: &'static str,
    pub conditions: Vec<Condition>,
    pub policy: PolicyName,
}

/// Outcome of dispatch. `rule` is `None` when no rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub policy: PolicyName,
    pub rule: Option<&'static str>,
}

impl Selection {
    pub fn rule_label(&self) -> &'static str {
        self.rule.unwrap_or("fallback")
    }
}

/// Rules evaluated in order; the first match wins and `Default` is the fallback.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchTable {
    rules: Vec<DispatchRule>,
}

impl DispatchTable {
    pub fn new(rules: Vec<DispatchRule>) -> Self {
        Self { rules }
    }

    /// Rules for archived enterprise docs.
    ///
    /// `developer-legacy` overlaps `node-era` for 2.13 – 2.18 and must stay first.
    pub fn standard() -> Self {
        Self::new(vec![
            DispatchRule {
                label: "developer-legacy",
                conditions: vec![
                    Condition::VersionSatisfies("<=2.18"),
                    Condition::DeveloperLegacyPath,
                ],
                policy: PolicyName::DeveloperDeprecated,
            },
            DispatchRule {
                label: "node-era",
                conditions: vec![
                    Condition::VersionSatisfies("<=2.19"),
                    Condition::VersionSatisfies(">2.12"),
                ],
                policy: PolicyName::NodeDeprecated,
            },
            DispatchRule {
                label: "static-era",
                conditions: vec![Condition::VersionSatisfies("<=2.12")],
                policy: PolicyName::StaticDeprecated,
            },
        ])
    }

    pub fn rules(&self) -> &[DispatchRule] {
        &self.rules
    }

    pub fn select(&self, facts: &RequestFacts, ranges: &dyn VersionRanges) -> Selection {
        self.rules
            .iter()
            .find(|rule| rule.conditions.iter().all(|c| c.holds(facts, ranges)))
            .map(|rule| Selection {
                policy: rule.policy,
                rule: Some(rule.label),
            })
            .unwrap_or(Selection {
                policy: PolicyName::Default,
                rule: None,
            })
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::standard()
    }
}
