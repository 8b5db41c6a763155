//! Per-user daily metering of chargeable calls.

mod guard;
mod memory;
mod sqlite;


pub use guard::QuotaGuard;
pub use memory::InMemoryQuotaStore;
pub use sqlite::SqliteQuotaStore;

use async_trait::async_trait;
use halal_types::UserQuotaState;

use crate::error::AppResult;

/// Backing storage for per-user quota state.
///
/// Implementations only persist; day rollover and limit checks belong to
/// [`QuotaGuard`], which serializes access per user.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// `None` for a user never seen before.
    async fn get_quota_state(&self, user_id: &str) -> AppResult<Option<UserQuotaState>>;

    async fn set_quota_state(&self, user_id: &str, state: UserQuotaState) -> AppResult<()>;

    /// Premium users are never metered.
    async fn is_premium(&self, user_id: &str) -> AppResult<bool> {
        Ok(self.get_quota_state(user_id).await?.is_some_and(|state| state.is_premium))
    }
}
