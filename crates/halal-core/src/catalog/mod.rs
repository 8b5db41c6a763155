//! Barcode → product resolution against an external read-only catalog.
//!
//! One outbound call per lookup, no retries. A product the catalog knows but
//! without ingredient text is `Found` with `raw_ingredient_text: None`, which
//! callers must keep distinct from `NotFound`.

mod open_food_facts;


pub use open_food_facts::OpenFoodFactsCatalog;

use async_trait::async_trait;
use halal_types::models::CatalogLookupResult;
use halal_types::ClassifyError;
use thiserror::Error;

/// Catalog could not give a trustworthy answer. Retrying later may help.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog transport error: {0}")]
    Transport(String),

    #[error("catalog returned HTTP {status}")]
    Status { status: u16 },

    #[error("catalog response malformed: {0}")]
    Malformed(String),
}

impl From<CatalogError> for ClassifyError {
    fn from(err: CatalogError) -> Self {
        let message = match err {
            CatalogError::Transport(_) => "catalog unreachable".to_string(),
            CatalogError::Status { status } => format!("catalog returned HTTP {}", status),
            CatalogError::Malformed(_) => "catalog response malformed".to_string(),
        };
        Self::CatalogUnavailable { message }
    }
}

#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn lookup(&self, barcode: &str) -> Result<CatalogLookupResult, CatalogError>;
}

/// Longest code accepted (GTIN-14). Shorter codes such as UPC-E or in-store
/// numbers are passed through for the catalog to decide.
const MAX_BARCODE_LEN: usize = 14;

/// Trim and check a barcode: 1 to 14 ASCII digits.
pub fn normalize_barcode(code: &str) -> Result<String, ClassifyError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ClassifyError::invalid("barcode is empty"));
    }
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClassifyError::invalid("barcode must contain digits only"));
    }
    if code.len() > MAX_BARCODE_LEN {
        return Err(ClassifyError::invalid("barcode must be at most 14 digits long"));
    }
    Ok(code.to_string())
}
