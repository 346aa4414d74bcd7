// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::analysis::AnalysisError;
use crate::hoppr::HopprError;
use crate::pathology::UnknownPathology;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    PayloadTooLarge(String),
    ValidationError {
        field: String,
        message: String,
    },
    UnknownPathology {
        pathology: String,
        available_pathologies: Vec<String>,
    },
    Upstream {
        status: Option<u16>,
        message: String,
    },
    AllModelsFailed {
        attempted: usize,
    },
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::PayloadTooLarge(msg) => ("payload_too_large", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::UnknownPathology {
                pathology,
                available_pathologies,
            } => {
                let mut details = HashMap::new();
                details.insert(
                    "available_pathologies".to_string(),
                    serde_json::Value::Array(
                        available_pathologies
                            .iter()
                            .map(|p| serde_json::Value::String(p.clone()))
                            .collect(),
                    ),
                );
                (
                    "unknown_pathology",
                    format!("Unknown pathology '{}'", pathology),
                    Some(details),
                )
            }
            ApiError::Upstream { status, message } => {
                let details = status.map(|s| {
                    let mut details = HashMap::new();
                    details.insert(
                        "upstream_status".to_string(),
                        serde_json::Value::Number(s.into()),
                    );
                    details
                });
                ("upstream_error", message.clone(), details)
            }
            ApiError::AllModelsFailed { attempted } => {
                let mut details = HashMap::new();
                details.insert(
                    "attempted_models".to_string(),
                    serde_json::Value::Number((*attempted).into()),
                );
                (
                    "all_models_failed",
                    "All models failed to analyze the image".to_string(),
                    Some(details),
                )
            }
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            success: false,
            error: message,
            error_type: error_type.to_string(),
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_)
            | ApiError::ValidationError { .. }
            | ApiError::UnknownPathology { .. } => 400,
            ApiError::PayloadTooLarge(_) => 413,
            // the remote's own 4xx/5xx passes through; anything else is ours
            ApiError::Upstream {
                status: Some(status),
                ..
            } if (400..600).contains(status) => *status,
            ApiError::Upstream { .. } => 500,
            ApiError::AllModelsFailed { .. } => 500,
            ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::UnknownPathology { pathology, .. } => {
                write!(f, "Unknown pathology '{}'", pathology)
            }
            ApiError::Upstream { status, message } => match status {
                Some(status) => write!(f, "Upstream error ({}): {}", status, message),
                None => write!(f, "Upstream error: {}", message),
            },
            ApiError::AllModelsFailed { attempted } => write!(
                f,
                "All models failed to analyze the image ({} attempted)",
                attempted
            ),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}

impl From<HopprError> for ApiError {
    fn from(err: HopprError) -> Self {
        match err {
            HopprError::Api { status, message } => ApiError::Upstream {
                status: Some(status),
                message,
            },
            other => ApiError::Upstream {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::AllModelsFailed { attempted } => ApiError::AllModelsFailed { attempted },
        }
    }
}

impl From<UnknownPathology> for ApiError {
    fn from(err: UnknownPathology) -> Self {
        ApiError::UnknownPathology {
            pathology: err.requested,
            available_pathologies: err.available,
        }
    }
}
