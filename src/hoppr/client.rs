// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hoppr AI inference client
//!
//! Every invocation runs the study flow the service expects: create a study,
//! attach the image, then prompt one model against that study.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use super::backend::ScoringBackend;
use super::types::{AnalysisResult, HopprError};

/// Content type used for image uploads
const DICOM_CONTENT_TYPE: &str = "application/dicom";

#[derive(Debug, Serialize)]
struct CreateStudyRequest<'a> {
    reference: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateStudyResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    organization: &'a str,
    response_format: &'a str,
}

/// Client for the Hoppr inference REST API
pub struct HopprClient {
    client: Client,
    endpoint: String,
    api_key: String,
    organization: String,
}

impl HopprClient {
    /// Create a new HopprClient
    pub fn new(endpoint: &str, api_key: &str, organization: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "Hoppr client configured: endpoint={}, organization={}, timeout={:?}",
            endpoint, organization, timeout
        );

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            organization: organization.to_string(),
        })
    }

    /// Get the configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.api_key)
    }

    /// Turn a non-2xx response into `HopprError::Api`
    async fn check_status(response: Response) -> Result<Response, HopprError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(HopprError::Api { status, message })
    }

    async fn create_study(&self) -> Result<String, HopprError> {
        let reference = Uuid::new_v4().to_string();
        let url = format!("{}/studies", self.endpoint);
        debug!("Hoppr create_study POST {}", url);

        let response = self
            .authorized(self.client.post(&url))
            .json(&CreateStudyRequest {
                reference: &reference,
            })
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let study: CreateStudyResponse = response
            .json()
            .await
            .map_err(|e| HopprError::MalformedResponse(format!("create study: {}", e)))?;
        Ok(study.id)
    }

    async fn add_study_image(&self, study_id: &str, image: Vec<u8>) -> Result<(), HopprError> {
        let image_id = Uuid::new_v4();
        let url = format!("{}/studies/{}/images/{}", self.endpoint, study_id, image_id);
        debug!("Hoppr add_study_image PUT {} ({} bytes)", url, image.len());

        let response = self
            .authorized(self.client.put(&url))
            .header(reqwest::header::CONTENT_TYPE, DICOM_CONTENT_TYPE)
            .body(image)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn prompt_model(
        &self,
        study_id: &str,
        model_id: &str,
    ) -> Result<serde_json::Value, HopprError> {
        let url = format!("{}/studies/{}/inference", self.endpoint, study_id);
        debug!("Hoppr prompt_model POST {} model={}", url, model_id);

        let response = self
            .authorized(self.client.post(&url))
            .json(&InferenceRequest {
                model: model_id,
                prompt: "",
                organization: &self.organization,
                response_format: "json",
            })
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| HopprError::MalformedResponse(format!("inference: {}", e)))?;

        if !payload.is_object() {
            return Err(HopprError::MalformedResponse(
                "inference payload is not a JSON object".to_string(),
            ));
        }
        if payload.get("success").and_then(|s| s.as_bool()) == Some(false) {
            let message = payload
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("unspecified error")
                .to_string();
            return Err(HopprError::Rejected {
                model_id: model_id.to_string(),
                message,
            });
        }

        Ok(payload)
    }
}

#[async_trait]
impl ScoringBackend for HopprClient {
    async fn score_image(
        &self,
        image_path: &Path,
        model_id: &str,
    ) -> Result<AnalysisResult, HopprError> {
        let start = Instant::now();
        let image = tokio::fs::read(image_path).await?;

        let study_id = self.create_study().await?;
        self.add_study_image(&study_id, image).await?;
        let payload = self.prompt_model(&study_id, model_id).await?;

        let result = AnalysisResult::success(model_id, Some(study_id), payload);
        debug!(
            "Hoppr model {} scored {:.3} in {}ms",
            model_id,
            result.score(),
            start.elapsed().as_millis()
        );
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "hoppr"
    }

    async fn health_check(&self) -> bool {
        match self
            .authorized(self.client.get(format!("{}/health", self.endpoint)))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Hoppr health check failed: {}", e);
                false
            }
        }
    }
}
