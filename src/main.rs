//! Shardcache - An in-memory cache sharded over a consistent hash ring
//!
//! HTTP server binary wrapping the cache coordinator.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shardcache::api::create_router;
use shardcache::tasks::SweepHandle;
use shardcache::{spawn_sweep_task, AppState, Config};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the coordinator and its initial shards
/// 4. Start background TTL sweep task (unless disabled)
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shardcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting shardcache server");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: shards={:?}, capacity_per_shard={}, virtual_nodes={}, default_ttl={:?}, sweep_interval={:?}, failover={}, port={}",
        config.shards,
        config.capacity_per_shard,
        config.virtual_nodes_per_shard,
        config.default_ttl_seconds,
        config.eviction_sweep_interval_seconds,
        config.failover_policy,
        config.server_port
    );

    let state = AppState::from_config(&config).context("failed to build shards")?;
    info!("Cache coordinator initialized");

    let sweeper = config
        .eviction_sweep_interval_seconds
        .map(|secs| spawn_sweep_task(state.cache.clone(), Duration::from_secs(secs)));
    if sweeper.is_none() {
        info!("Background sweep disabled, relying on lazy expiry");
    }

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

    stop_sweeper(sweeper).await;
    info!("Server shutdown complete");
    Ok(())
}

async fn stop_sweeper(sweeper: Option<SweepHandle>) {
    if let Some(sweeper) = sweeper {
        sweeper.shutdown().await;
        info!("Sweep task stopped");
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
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
                warn!("Failed to install SIGTERM handler: {}", err);
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
