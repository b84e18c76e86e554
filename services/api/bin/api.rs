//! Main Entrypoint for the Voice Assistant API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Building the shared application state and the metrics ticker.
//! 3. Constructing the Axum router and applying middleware.
//! 4. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use assistant_api::{
    config::Config,
    router::create_router,
    state::{AppState, spawn_metrics_ticker},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal. Shutting down gracefully..."),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C; shutting down."),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    if !config.speech_recognition {
        warn!("Speech recognition is disabled; voice sessions will report it as unavailable.");
    }
    if !config.speech_synthesis {
        warn!("Speech synthesis is disabled; replies will be sent as text only.");
    }

    // --- 3. Build State and Background Tasks ---
    let app_state = Arc::new(AppState::new(config.clone()));
    let metrics_ticker = spawn_metrics_ticker(app_state.clone());

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        bind_address = %config.bind_address,
        metrics_interval_ms = config.metrics_interval.as_millis() as u64,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    metrics_ticker.abort();
    info!("Server has shut down.");
    Ok(())
}
