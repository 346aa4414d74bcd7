// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gateway configuration loaded from the environment

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::analysis::DEFAULT_MAX_CONCURRENCY;

/// Default Hoppr API endpoint
pub const DEFAULT_HOPPR_BASE_URL: &str = "https://api.hoppr.ai";

/// Default upload cap (100 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Configuration for the gateway process
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address the HTTP server binds to
    pub host: String,
    /// Port the HTTP server binds to
    pub port: u16,
    /// Hoppr service settings
    pub hoppr: HopprConfig,
    /// Maximum in-flight model calls during a concurrent fan-out (1 to 4)
    pub max_concurrent_models: usize,
    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,
    /// Directory for staged uploads (OS temp dir when unset)
    pub upload_temp_dir: Option<PathBuf>,
    /// Reject unknown `pathology` values instead of using the default
    pub strict_pathology_lookup: bool,
}

/// Hoppr service settings
#[derive(Debug, Clone)]
pub struct HopprConfig {
    /// API key sent as a bearer token
    pub api_key: String,
    /// Base URL of the inference API
    pub base_url: String,
    /// Organization the inference is billed to
    pub organization: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl HopprConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("API_HOST").unwrap_or(defaults.host),
            port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            hoppr: HopprConfig {
                api_key: env::var("HOPPR_API_KEY").unwrap_or_default(),
                base_url: env::var("HOPPR_BASE_URL").unwrap_or(defaults.hoppr.base_url),
                organization: env::var("HOPPR_ORGANIZATION")
                    .unwrap_or(defaults.hoppr.organization),
                request_timeout_secs: env::var("HOPPR_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.hoppr.request_timeout_secs),
            },
            max_concurrent_models: env::var("MAX_CONCURRENT_MODELS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_concurrent_models),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            upload_temp_dir: env::var("UPLOAD_TEMP_DIR").ok().map(PathBuf::from),
            strict_pathology_lookup: env::var("STRICT_PATHOLOGY_LOOKUP")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.hoppr.api_key.trim().is_empty() {
            return Err("HOPPR_API_KEY must be set".to_string());
        }
        let parsed = url::Url::parse(&self.hoppr.base_url)
            .map_err(|e| format!("Invalid HOPPR_BASE_URL '{}': {}", self.hoppr.base_url, e))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(format!(
                "HOPPR_BASE_URL must be http or https, got '{}'",
                parsed.scheme()
            ));
        }
        if self.hoppr.request_timeout_secs == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        if self.max_concurrent_models == 0 || self.max_concurrent_models > DEFAULT_MAX_CONCURRENCY
        {
            return Err(format!(
                "MAX_CONCURRENT_MODELS must be between 1 and {}, got {}",
                DEFAULT_MAX_CONCURRENCY, self.max_concurrent_models
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be greater than 0".to_string());
        }
        Ok(())
    }

    /// `host:port` for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            hoppr: HopprConfig {
                api_key: String::new(),
                base_url: DEFAULT_HOPPR_BASE_URL.to_string(),
                organization: "hoppr".to_string(),
                request_timeout_secs: 120,
            },
            max_concurrent_models: DEFAULT_MAX_CONCURRENCY,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_temp_dir: None,
            strict_pathology_lookup: false,
        }
    }
}
