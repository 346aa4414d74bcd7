// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DICOM analysis API endpoint module
//!
//! Provides POST /api/analyze for single-model and all-model scoring.

pub mod handler;
pub mod request;
pub mod response;
pub mod upload;

pub use handler::analyze_handler;
pub use request::{AnalysisMode, AnalyzeForm, DICOM_FIELD};
pub use response::AnalyzeResponse;
pub use upload::{StagedUpload, StagingError};
