// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart form parsing and analysis mode selection

use axum::http::StatusCode;
use axum_extra::extract::multipart::MultipartError;
use axum_extra::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::analysis::FanOutStrategy;
use crate::api::errors::ApiError;
use crate::pathology::PathologyCatalog;

/// Multipart field carrying the image
pub const DICOM_FIELD: &str = "dicom";

/// Parsed `POST /api/analyze` form
#[derive(Debug, Clone, Default)]
pub struct AnalyzeForm {
    /// Original client filename
    pub filename: String,
    /// Raw image bytes
    pub data: Bytes,
    /// Explicit remote model id (single-model mode)
    pub model_id: Option<String>,
    /// Pathology name resolved through the catalog (single-model mode)
    pub pathology: Option<String>,
    /// `"true"` selects the concurrent fan-out
    pub parallel: Option<String>,
}

/// What the request asked for
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisMode {
    /// One model; `pathology` is set when it came from a catalog lookup
    Single {
        model_id: String,
        pathology: Option<String>,
    },
    /// Every catalog model
    FanOut(FanOutStrategy),
}

/// Body-limit overflows are 413; every other multipart failure is a bad request
fn multipart_error(context: &str, err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("DICOM upload exceeds the size limit".to_string())
    } else {
        ApiError::InvalidRequest(format!("{}: {}", context, err))
    }
}

/// Empty or whitespace-only text fields count as absent
fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl AnalyzeForm {
    /// Read every field of the multipart body.
    ///
    /// Fails with 400 when the `dicom` file part is missing or carries an
    /// empty filename.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = AnalyzeForm::default();
        let mut file: Option<(String, Bytes)> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("Malformed multipart body", e))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                DICOM_FIELD => {
                    // a plain text part named `dicom` is not a file upload
                    let Some(filename) = field.file_name().map(str::to_string) else {
                        continue;
                    };
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error("Failed to read DICOM file", e))?;
                    file = Some((filename, data));
                }
                "model_id" | "pathology" | "parallel" => {
                    let value = field.text().await.map_err(|e| ApiError::ValidationError {
                        field: name.clone(),
                        message: format!("Failed to read field: {}", e),
                    })?;
                    let value = non_empty(value);
                    match name.as_str() {
                        "model_id" => form.model_id = value,
                        "pathology" => form.pathology = value,
                        _ => form.parallel = value,
                    }
                }
                other => {
                    debug!("Ignoring unknown multipart field '{}'", other);
                }
            }
        }

        let (filename, data) =
            file.ok_or_else(|| ApiError::InvalidRequest("No DICOM file provided".to_string()))?;
        if filename.is_empty() {
            return Err(ApiError::InvalidRequest("Empty filename".to_string()));
        }

        form.filename = filename;
        form.data = data;
        Ok(form)
    }

    /// Pick the analysis mode: `model_id`, then `pathology`, then fan-out.
    ///
    /// `parallel` is only consulted for a fan-out.
    pub fn mode(&self, catalog: &PathologyCatalog, strict: bool) -> Result<AnalysisMode, ApiError> {
        if let Some(model_id) = &self.model_id {
            return Ok(AnalysisMode::Single {
                model_id: model_id.clone(),
                pathology: None,
            });
        }

        if let Some(pathology) = &self.pathology {
            let model_id = if strict {
                catalog.resolve_model_strict(pathology)?
            } else {
                catalog.resolve_model(pathology)
            };
            let resolved = catalog
                .pathology_for_model(model_id)
                .unwrap_or(catalog.default_pathology())
                .to_string();
            return Ok(AnalysisMode::Single {
                model_id: model_id.to_string(),
                pathology: Some(resolved),
            });
        }

        Ok(AnalysisMode::FanOut(FanOutStrategy::from_parallel_flag(
            self.parallel.as_deref(),
        )))
    }
}
