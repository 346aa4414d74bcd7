// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod hoppr;
pub mod pathology;
pub mod version;

// Re-export main types
pub use analysis::{BestMatch, FanOutStrategy, Orchestrator};
pub use api::{create_app, start_server, ApiError, AppState};
pub use config::GatewayConfig;
pub use hoppr::{AnalysisResult, HopprClient, HopprError, ScoringBackend};
pub use pathology::{PathologyCatalog, UnknownPathology};
