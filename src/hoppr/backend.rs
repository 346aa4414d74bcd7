// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scoring backend trait definition

use async_trait::async_trait;
use std::path::Path;

use super::types::{AnalysisResult, HopprError};

/// Anything that can score a staged image against one remote model.
///
/// Implementations must be safe to call concurrently against the same file;
/// the file is read-only for the lifetime of a request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoringBackend: Send + Sync {
    /// Score the image at `image_path` with `model_id`
    async fn score_image(
        &self,
        image_path: &Path,
        model_id: &str,
    ) -> Result<AnalysisResult, HopprError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Check whether the backend is reachable
    async fn health_check(&self) -> bool {
        true
    }
}
