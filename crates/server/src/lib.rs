//! HTTP recommendation service.
//!
//! The [`RecommendationOrchestrator`] owns everything a request needs (the
//! catalog, the loaded models, the filter pipeline) and is built once at
//! startup. The axum router in [`api`] exposes it over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod orchestrator;

pub use api::{AppState, create_router};
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use orchestrator::{MovieRecommendation, RecommendError, RecommendationOrchestrator};

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Bind `config.addr` and serve until Ctrl-C
pub async fn serve(config: &ServerConfig, orchestrator: RecommendationOrchestrator) -> Result<()> {
    if !orchestrator.models().contains(orchestrator.default_algo()) {
        warn!(
            "Default algorithm {} is not loaded; requests without `algo` will fail",
            orchestrator.default_algo()
        );
    }

    let app = create_router(AppState::new(orchestrator));
    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;

    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
