//! Socketmap - A Postfix socketmap lookup responder
//!
//! Binary entry point: configures logging, binds the socketmap listener and
//! the optional admin endpoint, and runs until Ctrl+C or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use socketmap::api::create_router;
use socketmap::cache::LookupCache;
use socketmap::{AppState, Config, Dispatcher, Server, StaticDirectory};

/// Main entry point for the socketmap responder.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the shared cache, directory and dispatcher
/// 4. Bind the socketmap listener
/// 5. Start the admin HTTP server if configured
/// 6. Serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "socketmap=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting socketmap service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: host={}, port={}, read_timeout={}s, write_timeout={}s, ttls(user={}s, domain={}s, alias={}s), admin_port={:?}",
        config.host,
        config.port,
        config.read_timeout,
        config.write_timeout,
        config.user_ttl,
        config.domain_ttl,
        config.alias_ttl,
        config.admin_port
    );

    let cache = Arc::new(LookupCache::new());
    let dispatcher = Dispatcher::new(cache.clone(), Arc::new(StaticDirectory::demo()))
        .with_ttls(config.table_ttls());

    let server = Server::bind(config.bind_addr(), dispatcher, config.connection_settings())
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!("Socketmap service listening on {}", server.local_addr()?);

    if let Some((host, port)) = config.admin_addr() {
        let listener = tokio::net::TcpListener::bind((host, port))
            .await
            .with_context(|| format!("failed to bind admin endpoint {host}:{port}"))?;
        let app = create_router(AppState::new(cache, server.stats()));
        info!("Admin endpoint listening on http://{}", listener.local_addr()?);

        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                error!("admin endpoint failed: {err}");
            }
        });
    }

    server.run_until(shutdown_signal()).await;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
