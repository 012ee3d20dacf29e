//! Immutable security-policy configurations and the append-only widening
//! that derives one configuration from another.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::Environment;
use crate::policy::directive::{Directive, SourceToken};

/// Value of the `referrer-policy` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferrerPolicy {
    NoReferrer,
    NoReferrerWhenDowngrade,
    Origin,
    OriginWhenCrossOrigin,
    SameOrigin,
    StrictOrigin,
    StrictOriginWhenCrossOrigin,
    UnsafeUrl,
}

impl ReferrerPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferrerPolicy::NoReferrer => "no-referrer",
            ReferrerPolicy::NoReferrerWhenDowngrade => "no-referrer-when-downgrade",
            ReferrerPolicy::Origin => "origin",
            ReferrerPolicy::OriginWhenCrossOrigin => "origin-when-cross-origin",
            ReferrerPolicy::SameOrigin => "same-origin",
            ReferrerPolicy::StrictOrigin => "strict-origin",
            ReferrerPolicy::StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
            ReferrerPolicy::UnsafeUrl => "unsafe-url",
        }
    }
}

/// Sources of a single directive.
///
/// `None` disables the directive (it is left out of the header). `Some(vec![])`
/// keeps the directive with no sources, which renders as the bare name.
pub type DirectiveSources = Option<Vec<SourceToken>>;

/// Domains owned by the docs product. Shared by several directives.
static TRUST_SET: [SourceToken; 5] = [
    SourceToken::SELF,
    SourceToken::from_static("github.com"),
    SourceToken::from_static("*.github.com"),
    SourceToken::from_static("*.githubusercontent.com"),
    SourceToken::from_static("*.githubassets.com"),
];

const PLACEHOLDER_IMAGES: SourceToken = SourceToken::from_static("placehold.it");
const LOCAL_DEV_ORIGIN: SourceToken = SourceToken::from_static("http://localhost:3000");
const VIDEO_EMBEDS: SourceToken = SourceToken::from_static("https://www.youtube-nocookie.com");

/// A complete set of security-header settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyConfiguration {
    pub resource_policy: bool,
    pub embedder_policy: bool,
    pub referrer_policy: ReferrerPolicy,
    directives: BTreeMap<Directive, DirectiveSources>,
}

impl PolicyConfiguration {
    /// An empty configuration with the given header flags.
    pub fn new(resource_policy: bool, embedder_policy: bool, referrer_policy: ReferrerPolicy) -> Self {
        Self {
            resource_policy,
            embedder_policy,
            referrer_policy,
            directives: BTreeMap::new(),
        }
    }

    /// Set a directive, dropping any `None` entries from the token list.
    pub fn with_directive<I>(mut self, directive: Directive, tokens: I) -> Self
    where
        I: IntoIterator<Item = Option<SourceToken>>,
    {
        self.directives
            .insert(directive, Some(tokens.into_iter().flatten().collect()));
        self
    }

    /// Mark a directive as disabled.
    pub fn without_directive(mut self, directive: Directive) -> Self {
        self.directives.insert(directive, None);
        self
    }

    /// The modern policy every current page is served with.
    pub fn baseline(env: &Environment) -> Self {
        let dev = env.is_development();
        let trusted = || TRUST_SET.iter().cloned().map(Some);

        let config = Self::new(true, false, ReferrerPolicy::NoReferrerWhenDowngrade)
            .with_directive(Directive::DefaultSrc, [Some(SourceToken::NONE)])
            .with_directive(Directive::PrefetchSrc, [Some(SourceToken::SELF)])
            // Hot reload in Safari needs `ws:`.
            .with_directive(
                Directive::ConnectSrc,
                [Some(SourceToken::SELF), dev.then_some(SourceToken::WS)],
            )
            .with_directive(
                Directive::FontSrc,
                [Some(SourceToken::SELF), Some(SourceToken::DATA)],
            )
            .with_directive(
                Directive::ImgSrc,
                trusted().chain([Some(SourceToken::DATA), Some(PLACEHOLDER_IMAGES)]),
            )
            .with_directive(Directive::ObjectSrc, [Some(SourceToken::SELF)])
            // `'unsafe-eval'` is for the eval-based dev build only. Never outside development.
            .with_directive(
                Directive::ScriptSrc,
                trusted().chain([
                    Some(SourceToken::SELF),
                    Some(SourceToken::DATA),
                    dev.then_some(SourceToken::UNSAFE_EVAL),
                ]),
            )
            .with_directive(Directive::ScriptSrcAttr, [Some(SourceToken::SELF)])
            .with_directive(
                Directive::FrameSrc,
                trusted().chain([
                    dev.then_some(LOCAL_DEV_ORIGIN),
                    env.support_portal_source(),
                    Some(VIDEO_EMBEDS),
                ]),
            );

        let config = if dev {
            config.with_directive(Directive::FrameAncestors, [Some(SourceToken::ANY)])
        } else {
            config.with_directive(Directive::FrameAncestors, trusted())
        };

        let config = config
            .with_directive(
                Directive::StyleSrc,
                trusted().chain([
                    Some(SourceToken::SELF),
                    Some(SourceToken::UNSAFE_INLINE),
                    Some(SourceToken::DATA),
                ]),
            )
            // Search in archived enterprise pages still embeds a frame.
            .with_directive(Directive::ChildSrc, [Some(SourceToken::SELF)])
            .with_directive(Directive::ManifestSrc, [Some(SourceToken::SELF)]);

        if dev {
            config.without_directive(Directive::UpgradeInsecureRequests)
        } else {
            config.with_directive(Directive::UpgradeInsecureRequests, std::iter::empty())
        }
    }

    /// Sources for a directive. Outer `None` means the directive is not mentioned.
    pub fn directive(&self, directive: Directive) -> Option<&DirectiveSources> {
        self.directives.get(&directive)
    }

    /// Sources for an enabled directive, or an empty slice.
    pub fn sources(&self, directive: Directive) -> &[SourceToken] {
        match self.directives.get(&directive) {
            Some(Some(tokens)) => tokens,
            _ => &[],
        }
    }

    pub fn allows(&self, directive: Directive, token: &SourceToken) -> bool {
        self.sources(directive).contains(token)
    }

    pub fn directives(&self) -> impl Iterator<Item = (Directive, &DirectiveSources)> {
        self.directives.iter().map(|(d, s)| (*d, s))
    }

    /// True when `self` keeps every flag of `base` and permits at least the
    /// sources `base` permits for each of its enabled directives.
    pub fn is_widening_of(&self, base: &PolicyConfiguration) -> bool {
        if self.resource_policy != base.resource_policy
            || self.embedder_policy != base.embedder_policy
            || self.referrer_policy != base.referrer_policy
        {
            return false;
        }

        base.directives.iter().all(|(directive, sources)| match sources {
            None => true,
            Some(tokens) => match self.directives.get(directive) {
                Some(Some(widened)) => tokens.iter().all(|t| widened.contains(t)),
                _ => false,
            },
        })
    }

    /// Render the `content-security-policy` header value.
    ///
    /// Directives are joined with `;`, sources with a space. Disabled directives
    /// are skipped and an empty source list renders as the bare directive name.
    pub fn content_security_policy(&self) -> String {
        let mut out = String::new();
        for (directive, sources) in &self.directives {
            let Some(tokens) = sources else { continue };
            if !out.is_empty() {
                out.push(';');
            }
            out.push_str(directive.as_str());
            for token in tokens {
                out.push(' ');
                out.push_str(token.as_str());
            }
        }
        out
    }
}

/// Appends to apply on top of a base configuration.
#[derive(Debug, Clone, Default)]
pub struct Widening {
    appends: Vec<(Directive, Vec<SourceToken>)>,
}

impl Widening {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append<I>(mut self, directive: Directive, tokens: I) -> Self
    where
        I: IntoIterator<Item = SourceToken>,
    {
        self.appends.push((directive, tokens.into_iter().collect()));
        self
    }
}

/// Derive a configuration from `base` by appending sources.
///
/// Existing tokens are never changed or removed. A directive that is disabled
/// or missing in `base` is enabled with exactly the appended sources.
pub fn widen(base: &PolicyConfiguration, widening: &Widening) -> PolicyConfiguration {
    let mut widened = base.clone();
    for (directive, tokens) in &widening.appends {
        widened
            .directives
            .entry(*directive)
            .or_insert(None)
            .get_or_insert_with(Vec::new)
            .extend(tokens.iter().cloned());
    }
    widened
}
