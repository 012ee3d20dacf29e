//! Security response headers.
//!
//! # Responsibilities
//! - Turn a `PolicyConfiguration` into a fixed set of response headers
//! - Compute those headers once per policy, at startup
//! - Layer them onto responses without overriding downstream handlers
//!
//! # Design Decisions
//! - Header values are encoded once; per-request work is a map merge
//! - A header already set by the downstream handler wins, as if the policy
//!   headers had been set before delegating
//! - `base-uri` and `form-action` default to `'self'` unless the policy names them

use axum::{
    body::Body,
    http::{
        header::{self, InvalidHeaderValue},
        HeaderMap, HeaderName, HeaderValue, Request,
    },
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use crate::policy::{Directive, PolicyConfiguration, SourceToken};

const CROSS_ORIGIN_EMBEDDER_POLICY: HeaderName = HeaderName::from_static("cross-origin-embedder-policy");
const CROSS_ORIGIN_OPENER_POLICY: HeaderName = HeaderName::from_static("cross-origin-opener-policy");
const CROSS_ORIGIN_RESOURCE_POLICY: HeaderName = HeaderName::from_static("cross-origin-resource-policy");
const ORIGIN_AGENT_CLUSTER: HeaderName = HeaderName::from_static("origin-agent-cluster");
const X_DNS_PREFETCH_CONTROL: HeaderName = HeaderName::from_static("x-dns-prefetch-control");
const X_DOWNLOAD_OPTIONS: HeaderName = HeaderName::from_static("x-download-options");
const X_PERMITTED_CROSS_DOMAIN_POLICIES: HeaderName =
    HeaderName::from_static("x-permitted-cross-domain-policies");
const X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");

const ONE_YEAR_HSTS: &str = "max-age=31536000; includeSubDomains";

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("invalid {header} value: {source}")]
    InvalidValue {
        header: &'static str,
        #[source]
        source: InvalidHeaderValue,
    },
}

/// Computes response headers for a policy configuration.
#[derive(Debug, Clone)]
pub struct HeaderApplicator {
    default_directives: Vec<(Directive, Vec<SourceToken>)>,
    strict_transport_security: HeaderValue,
}

impl Default for HeaderApplicator {
    fn default() -> Self {
        Self {
            default_directives: vec![
                (Directive::BaseUri, vec![SourceToken::SELF]),
                (Directive::FormAction, vec![SourceToken::SELF]),
            ],
            strict_transport_security: HeaderValue::from_static(ONE_YEAR_HSTS),
        }
    }
}

impl HeaderApplicator {
    /// The `content-security-policy` value, with applicator defaults filled in.
    pub fn content_security_policy(&self, config: &PolicyConfiguration) -> String {
        let mut filled = config.clone();
        for (directive, tokens) in &self.default_directives {
            if filled.directive(*directive).is_none() {
                filled = filled.with_directive(*directive, tokens.iter().cloned().map(Some));
            }
        }
        filled.content_security_policy()
    }

    /// Compute all headers for `config` once.
    pub fn bind(&self, config: &PolicyConfiguration) -> Result<BoundPolicy, HeaderError> {
        let mut headers = HeaderMap::new();

        let csp = self.content_security_policy(config);
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_str(&csp).map_err(|source| HeaderError::InvalidValue {
                header: "content-security-policy",
                source,
            })?,
        );

        if config.embedder_policy {
            headers.insert(CROSS_ORIGIN_EMBEDDER_POLICY, HeaderValue::from_static("require-corp"));
        }
        headers.insert(CROSS_ORIGIN_OPENER_POLICY, HeaderValue::from_static("same-origin"));
        if config.resource_policy {
            headers.insert(CROSS_ORIGIN_RESOURCE_POLICY, HeaderValue::from_static("same-origin"));
        }
        headers.insert(ORIGIN_AGENT_CLUSTER, HeaderValue::from_static("?1"));
        headers.insert(
            header::REFERRER_POLICY,
            HeaderValue::from_static(config.referrer_policy.as_str()),
        );
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            self.strict_transport_security.clone(),
        );
        headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off"));
        headers.insert(X_DOWNLOAD_OPTIONS, HeaderValue::from_static("noopen"));
        headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
        headers.insert(X_PERMITTED_CROSS_DOMAIN_POLICIES, HeaderValue::from_static("none"));
        headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));

        Ok(BoundPolicy { headers })
    }
}

/// Headers for one policy, ready to be applied to any number of responses.
#[derive(Debug, Clone)]
pub struct BoundPolicy {
    headers: HeaderMap,
}

impl BoundPolicy {
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Layer `preface` then the policy headers onto `target`.
    /// Names already present in `target` are left alone.
    pub fn apply_to(&self, target: &mut HeaderMap, preface: &HeaderMap) {
        target.remove(X_POWERED_BY);
        for (name, value) in preface.iter().chain(self.headers.iter()) {
            if !target.contains_key(name) {
                target.insert(name.clone(), value.clone());
            }
        }
    }

    /// Run the continuation, then set headers on its response.
    pub async fn handle(&self, req: Request<Body>, next: Next, preface: HeaderMap) -> Response {
        let mut response = next.run(req).await;
        self.apply_to(response.headers_mut(), &preface);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, RuntimeMode};
    use crate::policy::ReferrerPolicy;

    fn bind(mode: RuntimeMode) -> BoundPolicy {
        let config = PolicyConfiguration::baseline(&Environment::new(mode, None));
        HeaderApplicator::default().bind(&config).unwrap()
    }

    fn csp(bound: &BoundPolicy) -> &str {
        bound.headers()[header::CONTENT_SECURITY_POLICY].to_str().unwrap()
    }

    #[test]
    fn test_production_headers() {
        let bound = bind(RuntimeMode::Production);
        let headers = bound.headers();

        assert_eq!(headers[header::REFERRER_POLICY], "no-referrer-when-downgrade");
        assert_eq!(headers[CROSS_ORIGIN_RESOURCE_POLICY], "same-origin");
        assert!(!headers.contains_key(CROSS_ORIGIN_EMBEDDER_POLICY));
        assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
        assert_eq!(headers[header::STRICT_TRANSPORT_SECURITY], ONE_YEAR_HSTS);
        assert!(csp(&bound).contains(";upgrade-insecure-requests;"));
        assert!(csp(&bound).ends_with(";base-uri 'self';form-action 'self'"));
    }

    #[test]
    fn test_development_omits_upgrade_insecure_requests() {
        let bound = bind(RuntimeMode::Development);
        assert!(!csp(&bound).contains("upgrade-insecure-requests"));
        assert!(csp(&bound).contains("frame-ancestors *;"));
        assert!(csp(&bound).contains("'unsafe-eval'"));
    }

    #[test]
    fn test_policy_directive_overrides_applicator_default() {
        let config = PolicyConfiguration::new(false, true, ReferrerPolicy::NoReferrer)
            .with_directive(Directive::DefaultSrc, [Some(SourceToken::NONE)])
            .without_directive(Directive::FormAction);
        let bound = HeaderApplicator::default().bind(&config).unwrap();

        assert_eq!(csp(&bound), "default-src 'none';base-uri 'self'");
        assert_eq!(bound.headers()[CROSS_ORIGIN_EMBEDDER_POLICY], "require-corp");
        assert!(!bound.headers().contains_key(CROSS_ORIGIN_RESOURCE_POLICY));
        assert_eq!(bound.headers()[header::REFERRER_POLICY], "no-referrer");
    }

    #[test]
    fn test_invalid_token_is_rejected_at_bind() {
        let config = PolicyConfiguration::new(true, false, ReferrerPolicy::NoReferrer)
            .with_directive(Directive::FrameSrc, [Some(SourceToken::from("bad\nhost".to_string()))]);
        let err = HeaderApplicator::default().bind(&config).unwrap_err();
        assert!(err.to_string().starts_with("invalid content-security-policy value"));
    }

    #[test]
    fn test_apply_keeps_downstream_headers() {
        let bound = bind(RuntimeMode::Production);

        let mut preface = HeaderMap::new();
        preface.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

        let mut response = HeaderMap::new();
        response.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        response.insert(X_POWERED_BY, HeaderValue::from_static("Express"));

        bound.apply_to(&mut response, &preface);

        assert_eq!(response[header::X_FRAME_OPTIONS], "DENY");
        assert!(!response.contains_key(X_POWERED_BY));
        assert_eq!(response[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(response.contains_key(header::CONTENT_SECURITY_POLICY));
    }
}
