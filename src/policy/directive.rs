//! CSP directive names and source tokens.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// A Content-Security-Policy directive.
///
/// Variants are declared in the order the baseline policy lists them, so maps
/// keyed by `Directive` render deterministically in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Directive {
    DefaultSrc,
    PrefetchSrc,
    ConnectSrc,
    FontSrc,
    ImgSrc,
    ObjectSrc,
    ScriptSrc,
    ScriptSrcAttr,
    FrameSrc,
    FrameAncestors,
    StyleSrc,
    ChildSrc,
    ManifestSrc,
    UpgradeInsecureRequests,
    BaseUri,
    FormAction,
}

impl Directive {
    /// Wire name used in the header.
    pub fn as_str(self) -> &'static str {
        match self {
            Directive::DefaultSrc => "default-src",
            Directive::PrefetchSrc => "prefetch-src",
            Directive::ConnectSrc => "connect-src",
            Directive::FontSrc => "font-src",
            Directive::ImgSrc => "img-src",
            Directive::ObjectSrc => "object-src",
            Directive::ScriptSrc => "script-src",
            Directive::ScriptSrcAttr => "script-src-attr",
            Directive::FrameSrc => "frame-src",
            Directive::FrameAncestors => "frame-ancestors",
            Directive::StyleSrc => "style-src",
            Directive::ChildSrc => "child-src",
            Directive::ManifestSrc => "manifest-src",
            Directive::UpgradeInsecureRequests => "upgrade-insecure-requests",
            Directive::BaseUri => "base-uri",
            Directive::FormAction => "form-action",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One permitted source within a directive: a keyword, a scheme or a host pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SourceToken(Cow<'static, str>);

impl SourceToken {
    pub const NONE: SourceToken = SourceToken::from_static("'none'");
    pub const SELF: SourceToken = SourceToken::from_static("'self'");
    pub const UNSAFE_INLINE: SourceToken = SourceToken::from_static("'unsafe-inline'");
    pub const UNSAFE_EVAL: SourceToken = SourceToken::from_static("'unsafe-eval'");
    pub const DATA: SourceToken = SourceToken::from_static("data:");
    pub const WS: SourceToken = SourceToken::from_static("ws:");
    pub const ANY: SourceToken = SourceToken::from_static("*");

    pub const fn from_static(token: &'static str) -> Self {
        Self(Cow::Borrowed(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SourceToken {
    fn from(token: String) -> Self {
        Self(Cow::Owned(token))
    }
}

impl From<&'static str> for SourceToken {
    fn from(token: &'static str) -> Self {
        Self::from_static(token)
    }
}

impl fmt::Display for SourceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_order_follows_declaration() {
        assert!(Directive::DefaultSrc < Directive::PrefetchSrc);
        assert!(Directive::ManifestSrc < Directive::UpgradeInsecureRequests);
        assert!(Directive::UpgradeInsecureRequests < Directive::BaseUri);
    }

    #[test]
    fn test_directive_serializes_as_wire_name() {
        let json = serde_json::to_string(&Directive::ScriptSrcAttr).unwrap();
        assert_eq!(json, "\"script-src-attr\"");
        assert_eq!(Directive::ScriptSrcAttr.as_str(), "script-src-attr");
    }

    #[test]
    fn test_owned_and_static_tokens_compare_equal() {
        let owned = SourceToken::from("'self'".to_string());
        assert_eq!(owned, SourceToken::SELF);
        assert_eq!(owned.to_string(), "'self'");
    }
}
