//! Engine configuration.
//!
//! Read from the environment with [`EngineConfig::from_env`]:
//! - `MOLGRAPH_CLEAR_POLICY`: "strict" or "lenient" (default: "lenient")

use serde::{Deserialize, Serialize};

/// What targeted population does when asked to clear an absent cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearPolicy {
    /// Skip the missing entry and log a warning.
    #[default]
    Lenient,
    /// Fail with `CacheEntryNotFound`.
    Strict,
}

/// Engine-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub clear_policy: ClearPolicy,
}

impl EngineConfig {
    /// Reads the configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let clear_policy = match std::env::var("MOLGRAPH_CLEAR_POLICY") {
            Ok(v) if v.eq_ignore_ascii_case("strict") => ClearPolicy::Strict,
            _ => ClearPolicy::Lenient,
        };
        EngineConfig { clear_policy }
    }
}
