//! Classification pipeline errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the classification entry points.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ClassifyError {
    /// Request failed validation (empty text, bad barcode, undecodable image)
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of the validation failure
        message: String,
    },

    /// Non-premium user has used today's allotment
    #[error("Daily limit of {limit} scans reached")]
    LimitReached {
        /// The limit that was applied
        limit: u32,
    },

    /// Every credential tried for this request failed
    #[error("All credentials exhausted after {attempts} attempt(s)")]
    AllCredentialsExhausted {
        /// Number of provider calls made before giving up
        attempts: u32,
    },

    /// Provider refused the request itself (not the credential)
    #[error("Inference provider rejected the request: {message}")]
    ProviderRejected {
        /// Sanitised reason, safe to log
        message: String,
    },

    /// Catalog service could not be reached or answered garbage
    #[error("Product catalog unavailable: {message}")]
    CatalogUnavailable {
        /// Sanitised reason, safe to log
        message: String,
    },

    /// Backing quota store failed
    #[error("Quota store error: {message}")]
    QuotaStore {
        /// Description of the storage failure
        message: String,
    },
}

impl ClassifyError {
    /// Machine-readable code used by the HTTP layer.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
            Self::LimitReached { .. } => "LIMIT_REACHED",
            Self::AllCredentialsExhausted { .. } => "SERVICE_BUSY",
            Self::ProviderRejected { .. } => "ANALYSIS_FAILED",
            Self::CatalogUnavailable { .. } => "CATALOG_UNAVAILABLE",
            Self::QuotaStore { .. } => "INTERNAL",
        }
    }

    /// Whether the same request may succeed if repeated later.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::AllCredentialsExhausted { .. } | Self::CatalogUnavailable { .. })
    }

    /// Get HTTP status code for this error.
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } => 400,
            Self::LimitReached { .. } => 403,
            Self::AllCredentialsExhausted { .. } => 503,
            Self::ProviderRejected { .. } | Self::CatalogUnavailable { .. } => 502,
            Self::QuotaStore { .. } => 500,
        }
    }

    /// Message safe to show an end user. Never includes provider details.
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "The request could not be understood.",
            Self::LimitReached { .. } => "Daily limit reached. Upgrade to Premium for unlimited scans.",
            Self::AllCredentialsExhausted { .. }
            | Self::ProviderRejected { .. }
            | Self::CatalogUnavailable { .. }
            | Self::QuotaStore { .. } => "Something went wrong. Please try again later.",
        }
    }

    /// Shorthand for [`ClassifyError::InvalidRequest`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest { message: message.into() }
    }
}
