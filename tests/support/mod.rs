// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared test doubles: a scripted scoring backend and a multipart body builder

#![allow(dead_code)]

use async_trait::async_trait;
use hoppr_dicom_gateway::hoppr::{AnalysisResult, HopprError, ScoringBackend};
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted backend that records every call.
///
/// Models mapped to `Some(score)` succeed with that score, models mapped to
/// `None` fail with an upstream 503, anything else uses `default_score`.
pub struct ScriptedBackend {
    scores: HashMap<String, Option<f64>>,
    default_score: Option<f64>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
    paths: Mutex<Vec<PathBuf>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            scores: HashMap::new(),
            default_score: Some(0.5),
            delay: Duration::from_millis(0),
            calls: Mutex::new(Vec::new()),
            paths: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_score(mut self, model_id: &str, score: f64) -> Self {
        self.scores.insert(model_id.to_string(), Some(score));
        self
    }

    pub fn with_failure(mut self, model_id: &str) -> Self {
        self.scores.insert(model_id.to_string(), None);
        self
    }

    /// Unlisted models fail instead of scoring `default_score`
    pub fn failing_by_default(mut self) -> Self {
        self.default_score = None;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoringBackend for ScriptedBackend {
    async fn score_image(
        &self,
        image_path: &Path,
        model_id: &str,
    ) -> Result<AnalysisResult, HopprError> {
        self.calls.lock().unwrap().push(model_id.to_string());
        self.paths.lock().unwrap().push(image_path.to_path_buf());

        // the staged file must exist for as long as calls are in progress
        assert!(image_path.exists(), "staged image missing during call");

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let outcome = match self.scores.get(model_id) {
            Some(scripted) => *scripted,
            None => self.default_score,
        };
        match outcome {
            Some(score) => Ok(AnalysisResult::success(
                model_id,
                Some(format!("study-{}", model_id)),
                json!({"response": {"score": score}, "model": model_id}),
            )),
            None => Err(HopprError::Api {
                status: 503,
                message: format!("{} unavailable", model_id),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Catalog model id for a built-in pathology key
pub fn model_for(pathology: &str) -> String {
    format!("mc_chestradiography_{}:v1.20250828", pathology)
}

pub const BOUNDARY: &str = "----hoppr-test-boundary";

/// One multipart part
pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

/// Encode parts as a `multipart/form-data` body using [`BOUNDARY`]
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File {
                name,
                filename,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/dicom\r\n\r\n");
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
