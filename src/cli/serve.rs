// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use tracing::{info, warn};

use crate::api::{start_server, AppState};
use crate::config::GatewayConfig;
use crate::hoppr::ScoringBackend;

/// Arguments for the serve command; flags override the environment
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "API_HOST")]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long, env = "API_PORT")]
    pub port: Option<u16>,

    /// Concurrent fan-out width (overrides MAX_CONCURRENT_MODELS)
    #[arg(long)]
    pub max_concurrent_models: Option<usize>,

    /// Reject unknown pathology names instead of using the default
    #[arg(long)]
    pub strict_pathology_lookup: bool,
}

impl ServeArgs {
    /// Apply command-line overrides on top of an environment-derived config
    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(max) = self.max_concurrent_models {
            config.max_concurrent_models = max;
        }
        if self.strict_pathology_lookup {
            config.strict_pathology_lookup = true;
        }
    }
}

/// Load config, build the Hoppr-backed state and serve until Ctrl-C
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = GatewayConfig::from_env();
    args.apply(&mut config);
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    info!(
        "Starting {} on {} (hoppr={}, max_concurrent_models={}, strict_lookup={})",
        crate::version::get_version_string(),
        config.listen_addr(),
        config.hoppr.base_url,
        config.max_concurrent_models,
        config.strict_pathology_lookup
    );

    info!("Features: {}", crate::version::FEATURES.join(", "));

    let state = AppState::from_config(config)?;
    check_backend(state.orchestrator.backend().as_ref()).await;

    start_server(state).await
}

/// Startup reachability check; an unreachable backend is logged, not fatal
pub async fn check_backend(backend: &dyn ScoringBackend) -> bool {
    let healthy = backend.health_check().await;
    if healthy {
        info!("Scoring backend '{}' reachable", backend.name());
    } else {
        warn!(
            "Scoring backend '{}' did not answer its health check",
            backend.name()
        );
    }
    healthy
}
