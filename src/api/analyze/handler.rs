// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use std::time::Instant;
use tracing::{error, info, warn};

use super::request::{AnalysisMode, AnalyzeForm};
use super::response::AnalyzeResponse;
use super::upload::StagedUpload;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /api/analyze - Score an uploaded DICOM image
///
/// Pipeline:
/// 1. Parse the multipart form (400 on missing file or empty filename)
/// 2. Select the mode: `model_id`, then `pathology`, then fan-out
/// 3. Stage the upload to a temporary `.dcm` file
/// 4. Single mode: one remote call, upstream errors surfaced
/// 5. Fan-out: every catalog model, sequential or concurrent per `parallel`
/// 6. Attach the filename (and ranking for fan-out) and respond
///
/// The staged file is deleted when the handler returns, whatever the outcome.
pub async fn analyze_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let form = AnalyzeForm::from_multipart(multipart).await.map_err(|e| {
        warn!("Analyze request rejected: {}", e);
        e
    })?;

    let orchestrator = &state.orchestrator;
    let mode = form.mode(orchestrator.catalog(), state.config.strict_pathology_lookup)?;

    let staged = StagedUpload::stage(form.data, state.config.upload_temp_dir.clone())
        .await
        .map_err(|e| {
            error!("Failed to stage upload {}: {}", form.filename, e);
            ApiError::InternalError(e.to_string())
        })?;

    let start = Instant::now();
    let response = match mode {
        AnalysisMode::Single {
            model_id,
            pathology,
        } => {
            let result = orchestrator
                .analyze_single(staged.path(), &model_id)
                .await
                .map_err(|e| {
                    warn!("Model {} failed for {}: {}", model_id, form.filename, e);
                    ApiError::from(e)
                })?;
            AnalyzeResponse::single(result, form.filename, pathology)
        }
        AnalysisMode::FanOut(strategy) => {
            info!(
                "Analyzing DICOM file with all models: {} ({} bytes, {})",
                form.filename,
                staged.size_bytes(),
                strategy.as_str()
            );
            let best = orchestrator
                .fan_out(staged.path(), strategy)
                .await
                .map_err(|e| {
                    warn!("Fan-out failed for {}: {}", form.filename, e);
                    ApiError::from(e)
                })?;
            AnalyzeResponse::best_match(best, form.filename)
        }
    };

    info!(
        "Analysis of {} complete in {}ms",
        response.filename,
        start.elapsed().as_millis()
    );

    Ok(Json(response))
}
