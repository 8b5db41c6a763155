//! Product catalog records.

use serde::{Deserialize, Serialize};

/// Read-only view of a product in the external catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogRecord {
    pub barcode: String,
    pub name: String,
    /// `None` when the catalog knows the product but not its composition.
    pub raw_ingredient_text: Option<String>,
}

/// Successful catalog answers. Transport failures are reported separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLookupResult {
    Found(CatalogRecord),
    NotFound,
}
