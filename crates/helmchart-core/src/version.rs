//! Chart version parsing

use crate::error::{GenerationError, Result};
use semver::Version;

/// Chart version used when the caller does not pick one
pub const DEFAULT_CHART_VERSION: &str = "0.1.0";

/// Application version used when the caller does not pick one
pub const DEFAULT_APP_VERSION: &str = "1.16.0";

/// Parse a chart version string, accepting an optional leading `v`
///
/// Helm requires chart versions to be SemVer 2, so the normalized form
/// (without the `v`) is what ends up in `Chart.yaml`.
pub fn parse_chart_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).map_err(|e| {
        GenerationError::validation(
            "validate-chart-version",
            format!("invalid chart version '{}': {}", version_str, e),
        )
    })
}
