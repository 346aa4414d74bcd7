// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::http_server::AppState;
use crate::pathology::PathologyEntry;
use crate::version::{SERVICE_NAME, VERSION_NUMBER};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
            version: VERSION_NUMBER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelsResponse {
    pub success: bool,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathologiesResponse {
    pub success: bool,
    pub pathologies: Vec<PathologyEntry>,
}

/// GET /api/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /api/models - model ids in catalog order
pub async fn models_handler(State(state): State<AppState>) -> Json<ModelsResponse> {
    let models = state
        .orchestrator
        .catalog()
        .all_models()
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(ModelsResponse {
        success: true,
        models,
    })
}

/// GET /api/pathologies - catalog rows with display names
pub async fn pathologies_handler(State(state): State<AppState>) -> Json<PathologiesResponse> {
    Json(PathologiesResponse {
        success: true,
        pathologies: state.orchestrator.catalog().entries(),
    })
}
