use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use halal_types::UserQuotaState;

use super::QuotaStore;
use crate::error::AppResult;

/// Process-local store. Counters are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryQuotaStore {
    users: DashMap<String, UserQuotaState>,
}

impl InMemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant or revoke premium. Creates the user record if needed.
    pub fn set_premium(&self, user_id: &str, is_premium: bool, today: NaiveDate) {
        self.users
            .entry(user_id.to_string())
            .or_insert_with(|| UserQuotaState::fresh(today))
            .is_premium = is_premium;
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl QuotaStore for InMemoryQuotaStore {
    async fn get_quota_state(&self, user_id: &str) -> AppResult<Option<UserQuotaState>> {
        Ok(self.users.get(user_id).map(|entry| *entry))
    }

    async fn set_quota_state(&self, user_id: &str, state: UserQuotaState) -> AppResult<()> {
        self.users.insert(user_id.to_string(), state);
        Ok(())
    }
}
