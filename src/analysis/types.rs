// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fan-out strategy, per-pathology scores and best-match types

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::hoppr::AnalysisResult;

/// Number of runner-up entries reported alongside a best match
pub const TOP_SCORES: usize = 5;

/// How a fan-out invokes the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanOutStrategy {
    /// Catalog order, one call at a time
    Sequential,
    /// Bounded number of in-flight calls, gathered in completion order
    Concurrent,
}

impl FanOutStrategy {
    /// `parallel=true` (any casing) selects the concurrent strategy
    pub fn from_parallel_flag(flag: Option<&str>) -> Self {
        match flag {
            Some(v) if v.trim().eq_ignore_ascii_case("true") => FanOutStrategy::Concurrent,
            _ => FanOutStrategy::Sequential,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FanOutStrategy::Sequential => "sequential",
            FanOutStrategy::Concurrent => "concurrent",
        }
    }
}

/// One successful invocation collected during a fan-out
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPathology {
    pub pathology: String,
    pub score: f64,
    pub result: AnalysisResult,
}

/// Top-N pathology → score pairs, highest first.
///
/// Serializes as a JSON object whose keys keep the ranking order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedScores(pub Vec<(String, f64)>);

impl RankedScores {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, pathology: &str) -> bool {
        self.0.iter().any(|(p, _)| p == pathology)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, f64)> {
        self.0.iter()
    }
}

impl Serialize for RankedScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (pathology, score) in &self.0 {
            map.serialize_entry(pathology, score)?;
        }
        map.end()
    }
}

/// The winning invocation of a fan-out plus its runner-ups
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    pub pathology: String,
    pub score: f64,
    pub result: AnalysisResult,
    pub top_scores: RankedScores,
    /// Number of pathologies that returned a usable result
    pub succeeded: usize,
}

/// Fan-out failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    /// Every pathology in the catalog failed
    #[error("All models failed to analyze the image")]
    AllModelsFailed { attempted: usize },
}
