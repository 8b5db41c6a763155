//! Classification verdict returned to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dietary status of a product.
///
/// Only the result parser produces this from model text, so a raw model
/// string can never leak through as a status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictStatus {
    /// Permissible
    Halal,
    /// Impermissible
    Haram,
    /// Doubtful
    Mushbooh,
    /// Could not be determined
    #[default]
    Unknown,
}

impl VerdictStatus {
    /// Case-insensitive match against the three definite statuses.
    /// Anything else becomes [`VerdictStatus::Unknown`].
    pub fn from_loose(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("HALAL") {
            Self::Halal
        } else if trimmed.eq_ignore_ascii_case("HARAM") {
            Self::Haram
        } else if trimmed.eq_ignore_ascii_case("MUSHBOOH") {
            Self::Mushbooh
        } else {
            Self::Unknown
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Halal => "HALAL",
            Self::Haram => "HARAM",
            Self::Mushbooh => "MUSHBOOH",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured classification result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationVerdict {
    pub status: VerdictStatus,
    pub reason: String,
    /// Ingredients the model flagged, in the order it listed them
    #[serde(default)]
    pub flagged_ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
}

impl ClassificationVerdict {
    /// Fallback verdict carrying the uninterpretable text as its reason.
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::Unknown,
            reason: reason.into(),
            flagged_ingredients: Vec::new(),
            product_name: None,
        }
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }
}
