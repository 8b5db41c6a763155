//! Inference provider settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of the generative language API
    pub api_base_url: String,
    pub model: String,
    /// Upper bound on credentials tried per request (further capped by pool size)
    pub max_attempts: u32,
    /// Per-attempt timeout; expiry triggers failover
    pub attempt_timeout_secs: u64,
    /// First cool-down applied to a failing credential
    pub cooldown_base_secs: u64,
    /// Cool-down ceiling for repeatedly failing credentials
    pub cooldown_max_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-flash-latest".to_string(),
            max_attempts: 3,
            attempt_timeout_secs: 30,
            cooldown_base_secs: 5,
            cooldown_max_secs: 60,
        }
    }
}
