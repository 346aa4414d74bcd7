// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multi-model analysis orchestrator
//!
//! Runs one staged image against either a single model or every pathology in
//! the catalog and reduces the fan-out to a best match.

use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::types::{
    AnalysisError, BestMatch, FanOutStrategy, RankedScores, ScoredPathology, TOP_SCORES,
};
use crate::hoppr::{AnalysisResult, HopprError, ScoringBackend};
use crate::pathology::PathologyCatalog;

/// Default cap on in-flight model calls during a concurrent fan-out
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Dispatches scoring calls and reduces their results
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn ScoringBackend>,
    catalog: Arc<PathologyCatalog>,
    max_concurrency: usize,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn ScoringBackend>, catalog: Arc<PathologyCatalog>) -> Self {
        Self {
            backend,
            catalog,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Override the concurrent fan-out width, clamped to `1..=DEFAULT_MAX_CONCURRENCY`
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.clamp(1, DEFAULT_MAX_CONCURRENCY);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn catalog(&self) -> &PathologyCatalog {
        &self.catalog
    }

    pub fn backend(&self) -> &Arc<dyn ScoringBackend> {
        &self.backend
    }

    /// Score the image with exactly one model.
    ///
    /// Upstream errors are returned to the caller unchanged.
    pub async fn analyze_single(
        &self,
        image_path: &Path,
        model_id: &str,
    ) -> Result<AnalysisResult, HopprError> {
        info!("Analyzing with specified model: {}", model_id);
        let result = self.backend.score_image(image_path, model_id).await?;
        if !result.success {
            return Err(HopprError::Rejected {
                model_id: model_id.to_string(),
                message: result
                    .error
                    .unwrap_or_else(|| "unspecified error".to_string()),
            });
        }
        Ok(result)
    }

    /// Score the image with one model, never failing.
    ///
    /// Any upstream error becomes a tagged `success = false` result.
    pub async fn invoke(&self, image_path: &Path, model_id: &str) -> AnalysisResult {
        match self.backend.score_image(image_path, model_id).await {
            Ok(result) => result,
            Err(e) => AnalysisResult::failure(model_id, e.to_string()),
        }
    }

    async fn score_pathology(
        &self,
        image_path: &Path,
        pathology: &str,
        model_id: &str,
    ) -> Option<ScoredPathology> {
        debug!("Testing {}...", pathology);
        let result = self.invoke(image_path, model_id).await;

        if !result.success {
            warn!(
                "  → {}: FAILED ({})",
                pathology,
                result.error.as_deref().unwrap_or("no error detail")
            );
            return None;
        }

        let score = result.score();
        info!("  → {}: {:.3}", pathology, score);
        Some(ScoredPathology {
            pathology: pathology.to_string(),
            score,
            result,
        })
    }

    /// Run every pathology in the catalog and return the best match.
    pub async fn fan_out(
        &self,
        image_path: &Path,
        strategy: FanOutStrategy,
    ) -> Result<BestMatch, AnalysisError> {
        let start = Instant::now();
        let attempted = self.catalog.len();
        info!(
            "Fan-out over {} models via {} ({}, max_concurrency={})",
            attempted,
            self.backend.name(),
            strategy.as_str(),
            self.max_concurrency
        );

        let collected = match strategy {
            FanOutStrategy::Sequential => self.collect_sequential(image_path).await,
            FanOutStrategy::Concurrent => self.collect_concurrent(image_path).await,
        };

        let best = select_best(collected, attempted)?;
        info!(
            "Best match: {} ({:.3}) from {}/{} models in {}ms",
            best.pathology,
            best.score,
            best.succeeded,
            attempted,
            start.elapsed().as_millis()
        );
        Ok(best)
    }

    async fn collect_sequential(&self, image_path: &Path) -> Vec<ScoredPathology> {
        let mut collected = Vec::with_capacity(self.catalog.len());
        for (pathology, model_id) in self.catalog.iter() {
            if let Some(scored) = self.score_pathology(image_path, pathology, model_id).await {
                collected.push(scored);
            }
        }
        collected
    }

    async fn collect_concurrent(&self, image_path: &Path) -> Vec<ScoredPathology> {
        // owned pairs keep the per-model futures `Send` for the axum handler
        let entries: Vec<(String, String)> = self
            .catalog
            .iter()
            .map(|(pathology, model_id)| (pathology.to_string(), model_id.to_string()))
            .collect();

        stream::iter(entries)
            .map(|(pathology, model_id)| async move {
                self.score_pathology(image_path, &pathology, &model_id)
                    .await
            })
            .buffer_unordered(self.max_concurrency)
            .filter_map(|scored| async move { scored })
            .collect()
            .await
    }
}

/// Reduce collected successes to the highest score.
///
/// Ties keep the entry collected first. The ranked summary holds at most
/// [`TOP_SCORES`] entries, highest first, with the winner always at the head.
pub fn select_best(
    collected: Vec<ScoredPathology>,
    attempted: usize,
) -> Result<BestMatch, AnalysisError> {
    let succeeded = collected.len();

    let mut ranked: Vec<(String, f64)> = collected
        .iter()
        .map(|s| (s.pathology.clone(), s.score))
        .collect();
    // stable: equal scores keep collection order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(TOP_SCORES);

    let mut best: Option<ScoredPathology> = None;
    for scored in collected {
        let replace = match &best {
            Some(current) => scored.score.total_cmp(&current.score).is_gt(),
            None => true,
        };
        if replace {
            best = Some(scored);
        }
    }

    let best = best.ok_or(AnalysisError::AllModelsFailed { attempted })?;

    Ok(BestMatch {
        pathology: best.pathology,
        score: best.score,
        result: best.result,
        top_scores: RankedScores(ranked),
        succeeded,
    })
}
