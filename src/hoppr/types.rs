// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Result and error types for Hoppr model invocations

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of one remote model call.
///
/// `results` is the remote inference payload passed through untouched; the
/// confidence score lives at `results.response.score`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub success: bool,
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_id: Option<String>,
    #[serde(default)]
    pub results: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Successful call carrying the remote payload
    pub fn success(
        model_id: impl Into<String>,
        study_id: Option<String>,
        results: serde_json::Value,
    ) -> Self {
        Self {
            success: true,
            model_id: model_id.into(),
            study_id,
            results,
            error: None,
        }
    }

    /// Tagged failure; contributes nothing to a fan-out
    pub fn failure(model_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            model_id: model_id.into(),
            study_id: None,
            results: serde_json::Value::Null,
            error: Some(error.into()),
        }
    }

    /// Confidence score reported by the model.
    ///
    /// A missing or non-numeric `response.score` counts as 0.
    pub fn score(&self) -> f64 {
        self.results
            .get("response")
            .and_then(|r| r.get("score"))
            .and_then(|s| s.as_f64())
            .unwrap_or(0.0)
    }
}

/// Errors talking to the Hoppr inference service
#[derive(Debug, Error)]
pub enum HopprError {
    /// The service answered with a non-success HTTP status
    #[error("Hoppr API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Connection, TLS or timeout failure
    #[error("Hoppr request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered 2xx but the body was not what we expect
    #[error("Malformed Hoppr response: {0}")]
    MalformedResponse(String),

    /// The staged image could not be read
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// The service reported the inference itself as unsuccessful
    #[error("Model {model_id} reported failure: {message}")]
    Rejected { model_id: String, message: String },
}

impl HopprError {
    /// Upstream HTTP status, when the remote reported one
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            HopprError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
