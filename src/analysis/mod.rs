// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-model and fan-out analysis of an uploaded image

pub mod orchestrator;
pub mod types;

pub use orchestrator::{select_best, Orchestrator, DEFAULT_MAX_CONCURRENCY};
pub use types::{
    AnalysisError, BestMatch, FanOutStrategy, RankedScores, ScoredPathology, TOP_SCORES,
};
