//! Test helpers for halal-server unit tests.

use std::sync::Arc;

use tempfile::TempDir;

use halal_core::credential_pool::CooldownPolicy;
use halal_core::invoker::InvokerSettings;
use halal_core::testing::{ScriptedProvider, StaticCatalog};
use halal_core::utils::SystemClock;
use halal_core::{
    ClassificationOrchestrator, CredentialPool, InferenceInvoker, QuotaGuard, SqliteQuotaStore,
};
use halal_types::AppConfig;

use crate::state::AppState;

pub const TEST_USER: &str = "user-1";

/// Create an `AppState` backed by a scripted provider and an on-disk quota store.
///
/// Returns `(AppState, TempDir)` — keep `TempDir` alive for the test duration.
pub fn test_app_state_with(
    provider: Arc<ScriptedProvider>,
    catalog: StaticCatalog,
    daily_limit: u32,
) -> (AppState, TempDir) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let store = SqliteQuotaStore::open(temp_dir.path().join("quota.db"))
        .expect("failed to open quota store");

    let pool =
        Arc::new(CredentialPool::new(["test-key-1", "test-key-2"], CooldownPolicy::default()));
    let invoker = Arc::new(InferenceInvoker::new(pool, provider, InvokerSettings::default()));
    let quota = Arc::new(QuotaGuard::new(Arc::new(store), Arc::new(SystemClock), daily_limit));
    let orchestrator =
        Arc::new(ClassificationOrchestrator::new(Arc::new(catalog), invoker, quota));

    let mut config = AppConfig::default();
    config.quota.daily_limit = daily_limit;

    (AppState::new_with_components(orchestrator, config), temp_dir)
}

/// Minimal state whose provider answers HALAL for everything.
pub fn test_app_state() -> (AppState, TempDir) {
    let provider = ScriptedProvider::replying(
        r#"{"status":"HALAL","reason":"No doubtful ingredients.","ingredients_detected":[]}"#,
    )
    .into_arc();
    test_app_state_with(provider, StaticCatalog::new(), 3)
}
