mod config;
mod errors;
mod extraction;
mod models;
mod resume;
mod routes;
mod scoring;
mod similarity;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::scoring::ScoringEngine;
use crate::similarity::select_backend;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Select the similarity backend once; the embedding probe uses a blocking client.
    let embedding = config.embedding.clone();
    let similarity = tokio::task::spawn_blocking(move || select_backend(embedding.as_ref()))
        .await
        .context("similarity backend selection panicked")?;

    let engine = Arc::new(ScoringEngine::new(config.weights, similarity));
    info!(
        "Scoring engine ready (backend: {}, weights: {:?})",
        engine.backend_label(),
        engine.weights()
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        engine,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
