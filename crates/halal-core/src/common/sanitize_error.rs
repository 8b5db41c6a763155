//! Provider error sanitization — keeps credential labels, key fragments,
//! and raw upstream bodies out of anything returned to callers.
//!
//! Pattern: log the raw error server-side, carry only a category forward.

use crate::upstream::ProviderError;

/// Category-only description of a provider failure.
pub fn sanitize_provider_error(error: &ProviderError) -> String {
    match error {
        ProviderError::Transport(_) => "Upstream connection failed".to_string(),
        ProviderError::Timeout { .. } => "Upstream timed out".to_string(),
        ProviderError::RateLimited { .. } => "Rate limited (HTTP 429)".to_string(),
        ProviderError::Unauthorized { status } => format!("Authentication failed (HTTP {})", status),
        ProviderError::Upstream { status } => format!("Upstream server error (HTTP {})", status),
        ProviderError::BadRequest { status, .. } => format!("Request not accepted (HTTP {})", status),
        ProviderError::Blocked { .. } => "Content blocked by provider".to_string(),
        ProviderError::EmptyResponse => "Empty response".to_string(),
    }
}
