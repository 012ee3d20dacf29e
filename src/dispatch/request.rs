//! Request facts needed for dispatch: the language-stripped path and the
//! requested enterprise version.

use std::borrow::Cow;

use axum::body::Body;
use axum::http::Request;

use crate::dispatch::version::{ReleaseVersion, VersionIdentifier};

/// Removes a leading language segment from a path.
pub trait LanguagePrefix: Send + Sync {
    /// `/ja/enterprise/2.15` → `/enterprise/2.15`. Paths without a known
    /// language prefix are returned unchanged.
    fn strip_language_prefix<'a>(&self, path: &'a str) -> Cow<'a, str>;
}

/// Extracts the version a request targets.
pub trait VersionSource: Send + Sync {
    fn extract_requested_version(&self, req: &Request<Body>) -> RequestedVersion;
}

/// Result of version extraction. `None` for current (non-versioned) docs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedVersion {
    pub requested_version: Option<VersionIdentifier>,
}

/// Language codes that may prefix a docs path.
#[derive(Debug, Clone)]
pub struct LanguageCodes {
    codes: Vec<String>,
}

impl LanguageCodes {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }
}

impl LanguagePrefix for LanguageCodes {
    fn strip_language_prefix<'a>(&self, path: &'a str) -> Cow<'a, str> {
        let Some(rest) = path.strip_prefix('/') else {
            return Cow::Borrowed(path);
        };

        for code in &self.codes {
            if let Some(tail) = rest.strip_prefix(code.as_str()) {
                if tail.is_empty() {
                    return Cow::Borrowed("/");
                }
                if tail.starts_with('/') {
                    return Cow::Borrowed(tail);
                }
            }
        }
        Cow::Borrowed(path)
    }
}

/// Reads the version from `/enterprise/{X.Y}/...` or `/enterprise-server@{X.Y}/...`.
#[derive(Debug, Clone)]
pub struct EnterprisePathVersions {
    languages: LanguageCodes,
}

impl EnterprisePathVersions {
    pub fn new(languages: LanguageCodes) -> Self {
        Self { languages }
    }

    /// Version named by a language-stripped path, if any.
    pub fn version_in_path(path: &str) -> Option<VersionIdentifier> {
        let rest = path
            .strip_prefix("/enterprise/")
            .or_else(|| path.strip_prefix("/enterprise-server@"))?;
        let candidate = rest.split('/').next()?;

        ReleaseVersion::parse(candidate).map(|_| VersionIdentifier::new(candidate))
    }
}

impl VersionSource for EnterprisePathVersions {
    fn extract_requested_version(&self, req: &Request<Body>) -> RequestedVersion {
        let path = self.languages.strip_language_prefix(req.uri().path());
        RequestedVersion {
            requested_version: Self::version_in_path(&path),
        }
    }
}
