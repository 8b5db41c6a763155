//! Wiring of the production pipeline from configuration.

use halal_types::models::config::QuotaStoreKind;
use halal_types::AppConfig;
use std::sync::Arc;
use std::time::Duration;

use super::ClassificationOrchestrator;
use crate::catalog::OpenFoodFactsCatalog;
use crate::common::build_http_client;
use crate::credential_pool::{CooldownPolicy, CredentialPool};
use crate::error::{AppError, AppResult};
use crate::invoker::{InferenceInvoker, InvokerSettings};
use crate::quota::{InMemoryQuotaStore, QuotaGuard, QuotaStore, SqliteQuotaStore};
use crate::upstream::GeminiProvider;
use crate::utils::SystemClock;

impl ClassificationOrchestrator {
    /// Build the Gemini + Open Food Facts pipeline described by `config`.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let inference = &config.inference;

        // The invoker enforces the per-attempt timeout; the client timeout is a backstop.
        let inference_client =
            build_http_client(inference.attempt_timeout_secs.saturating_add(5))?;
        let catalog_client = build_http_client(config.catalog.timeout_secs)?;

        let pool = Arc::new(CredentialPool::new(
            &config.api_keys,
            CooldownPolicy::new(
                Duration::from_secs(inference.cooldown_base_secs),
                Duration::from_secs(inference.cooldown_max_secs),
            ),
        ));
        let provider = Arc::new(GeminiProvider::new(
            inference_client,
            &inference.api_base_url,
            &inference.model,
        ));
        let invoker =
            Arc::new(InferenceInvoker::new(pool, provider, InvokerSettings::from(inference)));

        let catalog = Arc::new(OpenFoodFactsCatalog::new(catalog_client, &config.catalog));

        let store: Arc<dyn QuotaStore> = match config.quota.store {
            QuotaStoreKind::Memory => Arc::new(InMemoryQuotaStore::new()),
            QuotaStoreKind::Sqlite => {
                let path = config.quota.sqlite_path.as_deref().ok_or_else(|| {
                    AppError::Unknown("quota.sqlite_path is required for the sqlite store".into())
                })?;
                Arc::new(SqliteQuotaStore::open(path)?)
            },
        };
        let quota =
            Arc::new(QuotaGuard::new(store, Arc::new(SystemClock), config.quota.daily_limit));

        tracing::info!(
            model = %inference.model,
            keys = config.api_keys.len(),
            store = ?config.quota.store,
            "Classification pipeline ready"
        );
        Ok(Self::new(catalog, invoker, quota))
    }
}
