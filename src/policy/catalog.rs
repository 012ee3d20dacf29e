//! The four named policies served by the docs site.
//!
//! Archived enterprise snapshots were generated under looser rules (inline
//! scripts, third-party analytics). Each archived era gets the baseline plus
//! the minimum extra sources it needs to keep working.

use std::fmt;

use serde::Serialize;

use crate::config::Environment;
use crate::policy::configuration::{widen, PolicyConfiguration, Widening};
use crate::policy::directive::{Directive, SourceToken};

const ANALYTICS_HTTP: SourceToken = SourceToken::from_static("http://www.google-analytics.com");
const ANALYTICS_SSL: SourceToken = SourceToken::from_static("https://ssl.google-analytics.com");
const ANALYTICS_HTTPS: SourceToken = SourceToken::from_static("https://www.google-analytics.com");
const GOOGLE_APIS: SourceToken = SourceToken::from_static("*.googleapis.com");
const GOOGLE_FONTS: SourceToken = SourceToken::from_static("*.gstatic.com");

/// Name of a policy in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyName {
    Default,
    NodeDeprecated,
    StaticDeprecated,
    DeveloperDeprecated,
}

impl PolicyName {
    pub const ALL: [PolicyName; 4] = [
        PolicyName::Default,
        PolicyName::NodeDeprecated,
        PolicyName::StaticDeprecated,
        PolicyName::DeveloperDeprecated,
    ];

    /// Stable label used in logs, metrics and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyName::Default => "default",
            PolicyName::NodeDeprecated => "node-deprecated",
            PolicyName::StaticDeprecated => "static-deprecated",
            PolicyName::DeveloperDeprecated => "developer-deprecated",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            PolicyName::Default => 0,
            PolicyName::NodeDeprecated => 1,
            PolicyName::StaticDeprecated => 2,
            PolicyName::DeveloperDeprecated => 3,
        }
    }
}

impl fmt::Display for PolicyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PolicyName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolicyName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown policy '{}'", s))
    }
}

/// Enterprise 2.13 – 2.19, rendered by the old Node.js site with analytics.
fn node_deprecated() -> Widening {
    Widening::new()
        .append(
            Directive::ScriptSrc,
            [
                SourceToken::UNSAFE_EVAL,
                SourceToken::UNSAFE_INLINE,
                ANALYTICS_HTTP,
                ANALYTICS_SSL,
            ],
        )
        .append(Directive::ConnectSrc, [ANALYTICS_HTTPS])
        .append(Directive::ImgSrc, [ANALYTICS_HTTP, ANALYTICS_SSL])
}

/// Pages imported from the old developer site, up to 2.18.
fn developer_deprecated() -> Widening {
    Widening::new()
        .append(Directive::StyleSrc, [GOOGLE_APIS])
        .append(
            Directive::ScriptSrc,
            [SourceToken::UNSAFE_INLINE, GOOGLE_APIS, ANALYTICS_HTTP],
        )
        .append(Directive::FontSrc, [GOOGLE_FONTS])
        .append(Directive::ScriptSrcAttr, [SourceToken::UNSAFE_INLINE])
}

/// Static site era, 2.12 and older. Search is an inline script.
fn static_deprecated() -> Widening {
    Widening::new().append(Directive::ScriptSrc, [SourceToken::UNSAFE_INLINE])
}

/// All policies, built once at startup.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyCatalog {
    default: PolicyConfiguration,
    node_deprecated: PolicyConfiguration,
    static_deprecated: PolicyConfiguration,
    developer_deprecated: PolicyConfiguration,
}

impl PolicyCatalog {
    /// Build the baseline and its archived-era variants.
    pub fn new(env: &Environment) -> Self {
        let default = PolicyConfiguration::baseline(env);
        Self {
            node_deprecated: widen(&default, &node_deprecated()),
            static_deprecated: widen(&default, &static_deprecated()),
            developer_deprecated: widen(&default, &developer_deprecated()),
            default,
        }
    }

    /// Configuration registered under `name`.
    pub fn get(&self, name: PolicyName) -> &PolicyConfiguration {
        match name {
            PolicyName::Default => &self.default,
            PolicyName::NodeDeprecated => &self.node_deprecated,
            PolicyName::StaticDeprecated => &self.static_deprecated,
            PolicyName::DeveloperDeprecated => &self.developer_deprecated,
        }
    }

    /// All policies, in `PolicyName::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (PolicyName, &PolicyConfiguration)> {
        PolicyName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeMode;

    fn catalogs() -> Vec<PolicyCatalog> {
        [RuntimeMode::Development, RuntimeMode::Production, RuntimeMode::Test]
            .into_iter()
            .map(|mode| PolicyCatalog::new(&Environment::new(mode, None)))
            .collect()
    }

    fn production_catalog() -> PolicyCatalog {
        PolicyCatalog::new(&Environment::new(RuntimeMode::Production, None))
    }

    #[test]
    fn test_every_variant_widens_default() {
        for catalog in catalogs() {
            let default = catalog.get(PolicyName::Default);
            for (name, config) in catalog.iter() {
                assert!(config.is_widening_of(default), "{} narrows default", name);
            }
        }
    }

    #[test]
    fn test_node_deprecated_appends() {
        let catalog = production_catalog();
        let node = catalog.get(PolicyName::NodeDeprecated);
        let default = catalog.get(PolicyName::Default);

        let script = node.sources(Directive::ScriptSrc);
        let added = &script[default.sources(Directive::ScriptSrc).len()..];
        assert_eq!(
            added,
            &[SourceToken::UNSAFE_EVAL, SourceToken::UNSAFE_INLINE, ANALYTICS_HTTP, ANALYTICS_SSL]
        );
        assert!(node.allows(Directive::ConnectSrc, &ANALYTICS_HTTPS));
        assert!(node.allows(Directive::ImgSrc, &ANALYTICS_SSL));
        assert_eq!(
            node.sources(Directive::StyleSrc),
            default.sources(Directive::StyleSrc)
        );
    }

    #[test]
    fn test_developer_deprecated_appends() {
        let catalog = production_catalog();
        let dev = catalog.get(PolicyName::DeveloperDeprecated);

        assert!(dev.allows(Directive::StyleSrc, &GOOGLE_APIS));
        assert!(dev.allows(Directive::ScriptSrc, &GOOGLE_APIS));
        assert!(dev.allows(Directive::ScriptSrc, &ANALYTICS_HTTP));
        assert!(!dev.allows(Directive::ScriptSrc, &SourceToken::UNSAFE_EVAL));
        assert!(dev.allows(Directive::FontSrc, &GOOGLE_FONTS));
        assert_eq!(
            dev.sources(Directive::ScriptSrcAttr),
            &[SourceToken::SELF, SourceToken::UNSAFE_INLINE]
        );
    }

    #[test]
    fn test_static_deprecated_only_allows_inline_scripts() {
        let catalog = production_catalog();
        let default = catalog.get(PolicyName::Default);
        let widened = catalog.get(PolicyName::StaticDeprecated);

        for (directive, _) in default.directives() {
            if directive == Directive::ScriptSrc {
                continue;
            }
            assert_eq!(default.directive(directive), widened.directive(directive));
        }
        assert!(widened.allows(Directive::ScriptSrc, &SourceToken::UNSAFE_INLINE));
    }

    #[test]
    fn test_policy_name_round_trips_through_label() {
        for name in PolicyName::ALL {
            assert_eq!(name.as_str().parse::<PolicyName>(), Ok(name));
        }
        assert!("strict".parse::<PolicyName>().is_err());
    }
}
