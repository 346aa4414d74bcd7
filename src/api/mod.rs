// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analyze;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use analyze::{analyze_handler, AnalysisMode, AnalyzeForm, AnalyzeResponse};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{HealthResponse, ModelsResponse, PathologiesResponse};
pub use http_server::{create_app, start_server, AppState};
