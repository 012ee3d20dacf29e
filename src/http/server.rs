//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the docs handler and health check
//! - Wire up middleware (security headers, timeout, request ID, tracing)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::lifecycle::shutdown;
use crate::security::{self, HelmetState};

/// HTTP server for the docs site.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server for the docs handler and health check.
    pub fn new(config: ServerConfig, helmet: Arc<HelmetState>) -> Self {
        let routes = Router::new()
            .route("/healthz", get(health_handler))
            .route("/", any(docs_handler))
            .route("/{*path}", any(docs_handler));
        Self::with_routes(&config, routes, helmet)
    }

    /// Create a server around caller-supplied routes.
    pub fn with_routes(config: &ServerConfig, routes: Router, helmet: Arc<HelmetState>) -> Self {
        Self {
            router: Self::build_router(config, routes, helmet),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The timeout sits inside the security headers so a 408 still carries them.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, routes: Router, helmet: Arc<HelmetState>) -> Router {
        let routes = routes.layer(TimeoutLayer::new(Duration::from_secs(
            config.timeouts.request_secs,
        )));

        security::apply(routes, helmet)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve connections from `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Stand-in for the page renderer that sits behind the security headers.
async fn docs_handler(uri: Uri) -> impl IntoResponse {
    (StatusCode::OK, format!("docs page: {}", uri.path()))
}
