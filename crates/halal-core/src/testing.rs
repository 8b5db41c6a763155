//! In-process doubles for exercising the pipeline without a network.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use halal_types::models::{CatalogLookupResult, CatalogRecord};

use crate::catalog::{CatalogError, CatalogLookup};
use crate::credential_pool::ApiKey;
use crate::upstream::{InferenceInput, InferenceProvider, ProviderError};

/// What the scripted provider does when called with a given secret.
#[derive(Debug, Clone)]
pub enum Step {
    Reply(String),
    Fail(ProviderError),
    /// Sleep this long before replying `"{}"`. Long enough to trip any attempt timeout.
    Hang(Duration),
}

/// One recorded provider call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub secret: String,
    pub input: InferenceInput,
}

/// Provider whose behaviour is fixed per secret.
///
/// Secrets without a script entry answer with `default_step`.
pub struct ScriptedProvider {
    steps: HashMap<String, Step>,
    default_step: Step,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(default_step: Step) -> Self {
        Self {
            steps: HashMap::new(),
            default_step,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Always replies with `text`, whatever the key.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(Step::Reply(text.into()))
    }

    pub fn with_step(mut self, secret: impl Into<String>, step: Step) -> Self {
        self.steps.insert(secret.into(), step);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_with(&self, secret: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.secret == secret).count()
    }

    /// Calls started but not yet returned.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    async fn generate(&self, key: &ApiKey, input: &InferenceInput) -> Result<String, ProviderError> {
        let secret = key.expose().to_string();
        self.calls.lock().push(RecordedCall { secret: secret.clone(), input: input.clone() });

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let step = self.steps.get(&secret).unwrap_or(&self.default_step).clone();
        match step {
            Step::Reply(text) => Ok(text),
            Step::Fail(err) => Err(err),
            Step::Hang(duration) => {
                tokio::time::sleep(duration).await;
                Ok("{}".to_string())
            },
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Catalog answering from a fixed table. Unknown barcodes are `NotFound`.
#[derive(Default)]
pub struct StaticCatalog {
    products: HashMap<String, CatalogRecord>,
    outage: Option<CatalogError>,
    lookups: AtomicUsize,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(
        mut self,
        barcode: &str,
        name: &str,
        ingredients: Option<&str>,
    ) -> Self {
        self.products.insert(
            barcode.to_string(),
            CatalogRecord {
                barcode: barcode.to_string(),
                name: name.to_string(),
                raw_ingredient_text: ingredients.map(str::to_string),
            },
        );
        self
    }

    /// Fail every lookup with `error`.
    pub fn unavailable(error: CatalogError) -> Self {
        Self { outage: Some(error), ..Self::default() }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogLookup for StaticCatalog {
    async fn lookup(&self, barcode: &str) -> Result<CatalogLookupResult, CatalogError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.outage {
            return Err(err.clone());
        }
        Ok(self
            .products
            .get(barcode)
            .cloned()
            .map_or(CatalogLookupResult::NotFound, CatalogLookupResult::Found))
    }
}
