//! Per-request entry point: CORS for safe methods, then the security headers
//! of whichever policy the dispatcher selects.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request},
    middleware::{self, Next},
    response::Response,
    Router,
};

use crate::config::Environment;
use crate::dispatch::Dispatcher;
use crate::observability::metrics;
use crate::policy::{PolicyCatalog, PolicyName};
use crate::security::headers::{BoundPolicy, HeaderApplicator, HeaderError};

/// Catalog, bound handlers and dispatcher. Built once, shared read-only.
#[derive(Debug)]
pub struct HelmetState {
    catalog: PolicyCatalog,
    handlers: Vec<BoundPolicy>,
    dispatcher: Dispatcher,
}

impl HelmetState {
    pub fn new(env: &Environment, dispatcher: Dispatcher) -> Result<Self, HeaderError> {
        Self::with_applicator(env, dispatcher, &HeaderApplicator::default())
    }

    pub fn with_applicator(
        env: &Environment,
        dispatcher: Dispatcher,
        applicator: &HeaderApplicator,
    ) -> Result<Self, HeaderError> {
        let catalog = PolicyCatalog::new(env);
        let handlers = PolicyName::ALL
            .into_iter()
            .map(|name| applicator.bind(catalog.get(name)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            catalog,
            handlers,
            dispatcher,
        })
    }

    pub fn catalog(&self) -> &PolicyCatalog {
        &self.catalog
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn handler(&self, name: PolicyName) -> &BoundPolicy {
        &self.handlers[name.index()]
    }
}

/// Safe methods get `access-control-allow-origin: *`.
pub fn allows_any_origin(method: &Method) -> bool {
    *method == Method::GET || *method == Method::OPTIONS
}

pub async fn helmet_middleware(
    State(state): State<Arc<HelmetState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut preface = HeaderMap::new();
    if allows_any_origin(req.method()) {
        preface.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        metrics::record_cors_allowed();
    }

    let selection = state.dispatcher.select(&req);
    tracing::debug!(
        policy = %selection.policy,
        rule = selection.rule_label(),
        path = %req.uri().path(),
        "Security policy selected"
    );
    metrics::record_policy_selected(selection.policy);

    state.handler(selection.policy).handle(req, next, preface).await
}

/// Wrap every route of `router` with the security-header middleware.
pub fn apply(router: Router, state: Arc<HelmetState>) -> Router {
    router.layer(middleware::from_fn_with_state(state, helmet_middleware))
}
