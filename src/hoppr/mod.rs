// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Remote scoring through the Hoppr AI inference service

pub mod backend;
pub mod client;
pub mod types;

pub use backend::ScoringBackend;
pub use client::HopprClient;
pub use types::{AnalysisResult, HopprError};
