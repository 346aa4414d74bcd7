// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Orchestrator fan-out tests against a scripted backend

use hoppr_dicom_gateway::analysis::{AnalysisError, FanOutStrategy, Orchestrator, TOP_SCORES};
use hoppr_dicom_gateway::pathology::PathologyCatalog;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

use crate::support::{model_for, ScriptedBackend};

fn staged_image() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".dcm").tempfile().unwrap();
    file.write_all(b"DICM").unwrap();
    file
}

fn orchestrator(backend: Arc<ScriptedBackend>, width: usize) -> Orchestrator {
    Orchestrator::new(backend, Arc::new(PathologyCatalog::default())).with_max_concurrency(width)
}

fn scripted() -> ScriptedBackend {
    ScriptedBackend::new()
        .with_score(&model_for("consolidation"), 0.88)
        .with_score(&model_for("infiltration"), 0.71)
        .with_score(&model_for("calcification"), 0.66)
        .with_score(&model_for("ild"), 0.12)
}

#[tokio::test]
async fn test_sequential_and_concurrent_agree() {
    let image = staged_image();

    let sequential_backend = Arc::new(scripted());
    let sequential = orchestrator(sequential_backend.clone(), 4)
        .fan_out(image.path(), FanOutStrategy::Sequential)
        .await
        .unwrap();

    let concurrent_backend = Arc::new(scripted().with_delay(Duration::from_millis(5)));
    let concurrent = orchestrator(concurrent_backend.clone(), 4)
        .fan_out(image.path(), FanOutStrategy::Concurrent)
        .await
        .unwrap();

    assert_eq!(sequential.pathology, "consolidation");
    assert_eq!(concurrent.pathology, "consolidation");
    assert_eq!(sequential.score, concurrent.score);
    assert_eq!(sequential.succeeded, 13);
    assert_eq!(concurrent.succeeded, 13);

    // the unique top three rank identically
    let head = |best: &hoppr_dicom_gateway::analysis::BestMatch| -> Vec<String> {
        best.top_scores.iter().take(3).map(|(p, _)| p.clone()).collect()
    };
    assert_eq!(head(&sequential), head(&concurrent));
    assert_eq!(
        head(&sequential),
        vec!["consolidation", "infiltration", "calcification"]
    );

    assert_eq!(sequential_backend.calls().len(), 13);
    assert_eq!(concurrent_backend.calls().len(), 13);
}

#[tokio::test]
async fn test_concurrent_respects_width() {
    let image = staged_image();

    for width in [1usize, 2, 4] {
        let backend = Arc::new(ScriptedBackend::new().with_delay(Duration::from_millis(10)));
        orchestrator(backend.clone(), width)
            .fan_out(image.path(), FanOutStrategy::Concurrent)
            .await
            .unwrap();
        assert_eq!(backend.max_in_flight(), width, "width {}", width);
        assert_eq!(backend.calls().len(), 13);
    }
}

#[tokio::test]
async fn test_zero_width_is_clamped() {
    let backend = Arc::new(ScriptedBackend::new());
    let orchestrator = orchestrator(backend, 0);
    assert_eq!(orchestrator.max_concurrency(), 1);
}

#[tokio::test]
async fn test_top_scores_capped_and_descending() {
    let image = staged_image();
    let mut backend = ScriptedBackend::new();
    for (i, pathology) in PathologyCatalog::default().list_pathologies().iter().enumerate() {
        backend = backend.with_score(&model_for(pathology), 0.05 * (i as f64 + 1.0));
    }
    let backend = Arc::new(backend);

    let best = orchestrator(backend, 4)
        .fan_out(image.path(), FanOutStrategy::Sequential)
        .await
        .unwrap();

    assert_eq!(best.pathology, "normal");
    assert_eq!(best.top_scores.len(), TOP_SCORES);
    assert!(best.top_scores.contains(&best.pathology));
    let scores: Vec<f64> = best.top_scores.iter().map(|(_, s)| *s).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_partial_failures_are_skipped() {
    let image = staged_image();
    let backend = Arc::new(
        ScriptedBackend::new()
            .failing_by_default()
            .with_score(&model_for("cardiomegaly"), 0.4)
            .with_score(&model_for("normal"), 0.2),
    );

    let best = orchestrator(backend.clone(), 4)
        .fan_out(image.path(), FanOutStrategy::Concurrent)
        .await
        .unwrap();

    assert_eq!(best.pathology, "cardiomegaly");
    assert_eq!(best.succeeded, 2);
    assert_eq!(best.top_scores.len(), 2);
    assert_eq!(backend.calls().len(), 13);
}

#[tokio::test]
async fn test_all_failures_are_aggregated() {
    let image = staged_image();
    let backend = Arc::new(ScriptedBackend::new().failing_by_default());

    for strategy in [FanOutStrategy::Sequential, FanOutStrategy::Concurrent] {
        let err = orchestrator(backend.clone(), 4)
            .fan_out(image.path(), strategy)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::AllModelsFailed { attempted: 13 }));
        assert_eq!(err.to_string(), "All models failed to analyze the image");
    }
}

#[tokio::test]
async fn test_single_zero_score_is_a_match() {
    let image = staged_image();
    let backend = Arc::new(ScriptedBackend::new().failing_by_default().with_score(&model_for("ild"), 0.0));

    let best = orchestrator(backend, 4)
        .fan_out(image.path(), FanOutStrategy::Sequential)
        .await
        .unwrap();
    assert_eq!(best.pathology, "ild");
    assert_eq!(best.score, 0.0);
}
