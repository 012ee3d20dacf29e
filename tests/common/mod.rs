//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use docs_helmet::config::{Environment, LanguageConfig, RuntimeMode, ServerConfig};
use docs_helmet::dispatch::{Dispatcher, LanguageCodes};
use docs_helmet::security::{HeaderApplicator, HelmetState};
use docs_helmet::{HttpServer, PolicyName, Shutdown};

/// Helmet state built the way the server builds it.
pub fn helmet_state(mode: RuntimeMode) -> Arc<HelmetState> {
    let env = Environment::new(mode, None);
    let dispatcher = Dispatcher::standard(LanguageCodes::new(LanguageConfig::default().codes));
    Arc::new(HelmetState::new(&env, dispatcher).unwrap())
}

/// The full server router, for in-process requests.
pub fn app(mode: RuntimeMode) -> (Router, Arc<HelmetState>) {
    let state = helmet_state(mode);
    let server = HttpServer::new(ServerConfig::default(), state.clone());
    (server.router(), state)
}

pub async fn send(app: &Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub fn csp_of(response: &Response<Body>) -> String {
    response.headers()[header::CONTENT_SECURITY_POLICY]
        .to_str()
        .unwrap()
        .to_string()
}

/// CSP header value that `policy` should produce.
pub fn expected_csp(state: &HelmetState, policy: PolicyName) -> String {
    HeaderApplicator::default().content_security_policy(state.catalog().get(policy))
}

/// Start the server on an ephemeral port.
pub async fn start_server(mode: RuntimeMode) -> (SocketAddr, Shutdown, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(ServerConfig::default(), helmet_state(mode));
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });

    (addr, shutdown, handle)
}
