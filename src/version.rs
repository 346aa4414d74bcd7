// Version information for the Hoppr DICOM gateway

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "Hoppr AI API";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "single-model-analysis",
    "sequential-fan-out",
    "concurrent-fan-out",
    "top-5-ranking",
    "strict-pathology-lookup",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {}", SERVICE_NAME, VERSION_NUMBER)
}
