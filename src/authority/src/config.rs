//! Registry configuration

use serde::{Deserialize, Serialize};

/// Authority registry configuration
///
/// Usually embedded in the proxy's own configuration file; every field has
/// a default so a partial section deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Compare host patterns and client hosts ASCII case-insensitively
    pub case_insensitive_hosts: bool,

    /// Check for equally specific patterns matching the same host
    pub detect_ambiguity: bool,

    /// Enable lookup counters
    pub enable_metrics: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            case_insensitive_hosts: true,
            detect_ambiguity: true,
            enable_metrics: true,
        }
    }
}
