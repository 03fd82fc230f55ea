//! Orbital - A meetings event-listing service
//!
//! Binary entry point: wires configuration, store, cache and router together.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orbital::api::create_router;
use orbital::store::seed;
use orbital::{AppState, Config};

/// Main entry point for the Orbital meetings server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the document store
/// 4. Seed default vocabularies and demo meetings when enabled
/// 5. Warm the metadata cache
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orbital=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Orbital meetings server");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        database = config.database_url.as_deref().unwrap_or("in-memory"),
        admin_guard = config.admin_token.is_some(),
        seed_data = config.seed_data,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config)
        .await
        .context("failed to open document store")?;
    info!(backend = state.meetings.backend_name(), "Document store ready");

    if config.seed_data {
        let items = seed::seed_metadata(&state.meetings)
            .await
            .context("failed to seed metadata")?;
        let meetings = seed::seed_meetings(&state.meetings)
            .await
            .context("failed to seed meetings")?;
        info!(items, meetings, "Seed data applied");
    }

    state
        .metadata
        .preload_common()
        .await
        .context("failed to preload metadata cache")?;

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
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
