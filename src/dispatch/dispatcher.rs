//! Dispatcher: collaborators plus the rule table.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;

use crate::dispatch::request::{EnterprisePathVersions, LanguageCodes, LanguagePrefix, VersionSource};
use crate::dispatch::table::{DispatchTable, RequestFacts, Selection};
use crate::dispatch::version::{ReleaseRanges, VersionRanges};

/// Picks the policy for a request.
#[derive(Clone)]
pub struct Dispatcher {
    table: DispatchTable,
    languages: Arc<dyn LanguagePrefix>,
    versions: Arc<dyn VersionSource>,
    ranges: Arc<dyn VersionRanges>,
}

impl Dispatcher {
    pub fn new(
        table: DispatchTable,
        languages: Arc<dyn LanguagePrefix>,
        versions: Arc<dyn VersionSource>,
        ranges: Arc<dyn VersionRanges>,
    ) -> Self {
        Self {
            table,
            languages,
            versions,
            ranges,
        }
    }

    /// Standard rules over path-based version extraction.
    pub fn standard(languages: LanguageCodes) -> Self {
        Self::new(
            DispatchTable::standard(),
            Arc::new(languages.clone()),
            Arc::new(EnterprisePathVersions::new(languages)),
            Arc::new(ReleaseRanges),
        )
    }

    /// The rule table, in precedence order.
    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Version and language-stripped path of a request.
    pub fn facts_for(&self, req: &Request<Body>) -> RequestFacts {
        let requested = self.versions.extract_requested_version(req);
        let stripped = self.languages.strip_language_prefix(req.uri().path());
        RequestFacts::new(requested.requested_version, stripped.into_owned())
    }

    /// Policy for already-extracted facts.
    pub fn select_facts(&self, facts: &RequestFacts) -> Selection {
        self.table.select(facts, self.ranges.as_ref())
    }

    /// Policy for a request.
    pub fn select(&self, req: &Request<Body>) -> Selection {
        self.select_facts(&self.facts_for(req))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
