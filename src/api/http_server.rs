// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::analyze::analyze_handler;
use super::handlers::{health_handler, models_handler, pathologies_handler};
use crate::analysis::Orchestrator;
use crate::config::GatewayConfig;
use crate::hoppr::{HopprClient, ScoringBackend};
use crate::pathology::PathologyCatalog;

/// Process-wide state shared read-only by every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, config: GatewayConfig) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(config),
        }
    }

    /// Wire a backend to the built-in catalog using the config's fan-out width
    pub fn with_backend(backend: Arc<dyn ScoringBackend>, config: GatewayConfig) -> Self {
        let orchestrator = Orchestrator::new(backend, Arc::new(PathologyCatalog::default()))
            .with_max_concurrency(config.max_concurrent_models);
        Self::new(orchestrator, config)
    }

    /// Production state: Hoppr client built from the config
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let client = HopprClient::new(
            &config.hoppr.base_url,
            &config.hoppr.api_key,
            &config.hoppr.organization,
            config.hoppr.request_timeout(),
        )?;
        Ok(Self::with_backend(Arc::new(client), config))
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/models", get(models_handler))
        .route("/api/pathologies", get(pathologies_handler))
        .route("/api/analyze", post(analyze_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<()> {
    let listen_addr = state.config.listen_addr();
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(listen_addr.as_str()).await?;
    let addr: SocketAddr = listener.local_addr()?;

    tracing::info!("API server listening on {}", addr);
    tracing::info!("Health Check: http://{}/api/health", addr);
    tracing::info!("Analyze Endpoint: POST http://{}/api/analyze", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
