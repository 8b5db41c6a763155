//! Open Food Facts product API (`/api/v0/product/{code}.json`).

use async_trait::async_trait;
use halal_types::models::config::CatalogConfig;
use halal_types::models::{CatalogLookupResult, CatalogRecord};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};

use super::{CatalogError, CatalogLookup};

pub struct OpenFoodFactsCatalog {
    http_client: Client,
    base_url: String,
    languages: Vec<String>,
    fallback_name: String,
}

impl OpenFoodFactsCatalog {
    pub fn new(http_client: Client, config: &CatalogConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            languages: config.languages.clone(),
            fallback_name: config.fallback_product_name.clone(),
        }
    }

    fn product_url(&self, barcode: &str) -> String {
        format!("{}/api/v0/product/{}.json", self.base_url, barcode)
    }

    /// Interpret a product API response body.
    pub(super) fn interpret(&self, barcode: &str, body: &Value) -> CatalogLookupResult {
        // status is 1 for found, 0 for unknown products
        let found = body.get("status").and_then(Value::as_i64) == Some(1);
        let product = body.get("product").and_then(Value::as_object);

        let (true, Some(product)) = (found, product) else {
            return CatalogLookupResult::NotFound;
        };

        let name = self
            .localized(product, "product_name")
            .unwrap_or_else(|| self.fallback_name.clone());
        let raw_ingredient_text = self.localized(product, "ingredients_text");

        CatalogLookupResult::Found(CatalogRecord {
            barcode: barcode.to_string(),
            name,
            raw_ingredient_text,
        })
    }

    /// First non-blank `<field>_<lang>` over preferred languages, then `<field>`.
    fn localized(&self, product: &Map<String, Value>, field: &str) -> Option<String> {
        self.languages
            .iter()
            .map(|lang| format!("{}_{}", field, lang))
            .chain(std::iter::once(field.to_string()))
            .find_map(|key| non_blank(product.get(&key)))
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[async_trait]
impl CatalogLookup for OpenFoodFactsCatalog {
    async fn lookup(&self, barcode: &str) -> Result<CatalogLookupResult, CatalogError> {
        let response = self
            .http_client
            .get(self.product_url(barcode))
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(barcode, "Catalog returned 404");
            return Ok(CatalogLookupResult::NotFound);
        }
        if !status.is_success() {
            tracing::warn!(barcode, status = status.as_u16(), "Catalog lookup failed");
            return Err(CatalogError::Status { status: status.as_u16() });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CatalogError::Malformed(e.without_url().to_string()))?;

        let result = self.interpret(barcode, &body);
        tracing::debug!(
            barcode,
            found = matches!(result, CatalogLookupResult::Found(_)),
            "Catalog lookup complete"
        );
        Ok(result)
    }
}
