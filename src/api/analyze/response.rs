// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis response body

use serde::Serialize;

use crate::analysis::{BestMatch, RankedScores};
use crate::hoppr::AnalysisResult;

/// The remote result as returned by the model, with request metadata injected
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub result: AnalysisResult,
    /// Original client filename
    pub filename: String,
    /// Pathology the result belongs to (catalog-resolved and fan-out modes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathology: Option<String>,
    /// Top pathology scores, highest first (fan-out mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_scores: Option<RankedScores>,
}

impl AnalyzeResponse {
    /// Single-model response; no ranking attached
    pub fn single(result: AnalysisResult, filename: String, pathology: Option<String>) -> Self {
        Self {
            result,
            filename,
            pathology,
            all_scores: None,
        }
    }

    /// Fan-out response built from the winning model
    pub fn best_match(best: BestMatch, filename: String) -> Self {
        Self {
            result: best.result,
            filename,
            pathology: Some(best.pathology),
            all_scores: Some(best.top_scores),
        }
    }
}
