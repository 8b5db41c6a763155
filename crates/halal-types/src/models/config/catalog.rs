//! Product catalog settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    /// Preferred languages for product name and ingredient text, in order
    pub languages: Vec<String>,
    pub timeout_secs: u64,
    /// Name used when the catalog has no name in any language
    pub fallback_product_name: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://world.openfoodfacts.org".to_string(),
            languages: vec!["ru".to_string(), "en".to_string()],
            timeout_secs: 10,
            fallback_product_name: "Product".to_string(),
        }
    }
}
