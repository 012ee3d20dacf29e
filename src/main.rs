use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use docs_helmet::config::{load_config, Environment, ServerConfig};
use docs_helmet::dispatch::{Dispatcher, LanguageCodes};
use docs_helmet::lifecycle::{signals, Shutdown};
use docs_helmet::observability::{logging, metrics};
use docs_helmet::security::{HeaderApplicator, HelmetState};
use docs_helmet::HttpServer;

#[derive(Parser)]
#[command(name = "docs-helmet")]
#[command(about = "Docs server with per-version security headers", long_about = None)]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("docs-helmet v{} starting", env!("CARGO_PKG_VERSION"));

    let env = Environment::from_env();
    tracing::info!(
        mode = %env.mode().as_str(),
        development = env.is_development(),
        support_portal = ?env.support_portal_source().map(|s| s.to_string()),
        "Environment loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let dispatcher = Dispatcher::standard(LanguageCodes::new(config.languages.codes.clone()));
    let helmet = Arc::new(HelmetState::new(&env, dispatcher)?);

    let applicator = HeaderApplicator::default();
    for (name, policy) in helmet.catalog().iter() {
        tracing::debug!(
            policy = %name,
            csp = %applicator.content_security_policy(policy),
            "Security policy bound"
        );
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config, helmet)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
