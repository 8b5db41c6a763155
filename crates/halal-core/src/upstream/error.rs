use std::time::Duration;
use thiserror::Error;

/// Failure of a single provider call.
///
/// Display strings may contain upstream detail and are for server logs only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Connection failure before a response arrived
    #[error("transport error: {0}")]
    Transport(String),

    /// No response within the per-attempt timeout
    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Key is over quota or rate limited (429)
    #[error("rate limited{}", retry_after_secs.map(|s| format!(", retry after {s}s")).unwrap_or_default())]
    RateLimited { retry_after_secs: Option<u64> },

    /// Key is invalid, revoked, or lacks permission
    #[error("credential rejected (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Provider-side failure (5xx)
    #[error("upstream error (HTTP {status})")]
    Upstream { status: u16 },

    /// The request itself was refused; another key would fare no better
    #[error("bad request (HTTP {status}): {message}")]
    BadRequest { status: u16, message: String },

    /// Prompt blocked by the provider's safety filter
    #[error("blocked by provider: {reason}")]
    Blocked { reason: String },

    /// 200 response without any text
    #[error("empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Whether trying another credential could help.
    pub const fn should_rotate(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::Timeout { .. }
                | Self::RateLimited { .. }
                | Self::Unauthorized { .. }
                | Self::Upstream { .. }
                | Self::EmptyResponse
        )
    }

    /// Provider-suggested wait before this key is used again.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after_secs: Some(secs) } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }

    /// Map an HTTP error status and body to a variant.
    pub fn from_status(status: u16, body: &str, retry_after_header: Option<&str>) -> Self {
        match status {
            429 => Self::RateLimited {
                retry_after_secs: retry_after_header
                    .and_then(|h| h.trim().parse::<u64>().ok())
                    .or_else(|| super::parse_retry_delay(body)),
            },
            401 | 403 => Self::Unauthorized { status },
            // Gemini reports bad keys as 400 INVALID_ARGUMENT.
            400 if body.contains("API_KEY_INVALID") || body.contains("API key not valid") => {
                Self::Unauthorized { status }
            },
            400..=499 => Self::BadRequest { status, message: extract_message(body) },
            _ => Self::Upstream { status },
        }
    }
}

fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
