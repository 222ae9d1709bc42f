//! Rotasched API server entry point.

use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rotasched_api::{AppState, build_router};
use rotasched_config::AppConfig;
use rotasched_storage::InMemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Rotasched API server...");
    tracing::info!("Binding to {}", config.bind_address);

    // The in-memory store ships unseeded; wiring it to a real document store
    // (Firestore or otherwise) is out of scope here. `/v1/ready` reports
    // `store: "unseeded"` until `configuration/main` and the roster are
    // loaded through whatever production bootstrap fills them.
    let store = Arc::new(InMemoryStore::new());

    let state = Arc::new(AppState {
        store,
        config,
        start_time: Instant::now(),
    });

    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&state.config.bind_address).await?;
    tracing::info!("Rotasched API server listening on {}", state.config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
