//! Daily limit enforcement.
//!
//! A call is charged before its work starts and the charge is never refunded,
//! so an operation that later fails still consumes the slot. Premium users are
//! counted but never refused. The read-check-increment-persist sequence runs
//! under a per-user async lock; the lock is released before the metered
//! operation runs and dropped from the lock table once nobody holds it.

use dashmap::DashMap;
use halal_types::{ClassifyError, QuotaStatus, UserQuotaState};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::QuotaStore;
use crate::error::AppError;
use crate::utils::Clock;

pub struct QuotaGuard {
    store: Arc<dyn QuotaStore>,
    clock: Arc<dyn Clock>,
    daily_limit: u32,
    user_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl QuotaGuard {
    pub fn new(store: Arc<dyn QuotaStore>, clock: Arc<dyn Clock>, daily_limit: u32) -> Self {
        Self { store, clock, daily_limit, user_locks: DashMap::new() }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Charge one call to `user_id`, then run `op`.
    ///
    /// Returns `LimitReached` without running `op` when a non-premium user has
    /// used up today's allotment.
    pub async fn guard<T, F, Fut>(&self, user_id: &str, op: F) -> Result<T, ClassifyError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClassifyError>>,
    {
        self.charge(user_id).await?;
        op().await
    }

    /// Record one chargeable call, or refuse it.
    pub async fn charge(&self, user_id: &str) -> Result<(), ClassifyError> {
        let lock = self.user_lock(user_id);
        let _held = lock.acquire().await;

        let today = self.clock.today();
        let mut state = self.load(user_id).await?.unwrap_or_else(|| UserQuotaState::fresh(today));
        let reset = state.roll_over(today);
        let is_premium = self.store.is_premium(user_id).await.map_err(store_error)?;

        if !is_premium && state.daily_count >= self.daily_limit {
            if reset {
                self.save(user_id, state).await?;
            }
            tracing::info!(
                user_id,
                used = state.daily_count,
                limit = self.daily_limit,
                "Daily limit reached"
            );
            return Err(ClassifyError::LimitReached { limit: self.daily_limit });
        }

        state.daily_count = state.daily_count.saturating_add(1);
        self.save(user_id, state).await?;
        tracing::debug!(user_id, used = state.daily_count, is_premium, "Quota charged");
        Ok(())
    }

    /// Current usage after applying the day reset.
    pub async fn status(&self, user_id: &str) -> Result<QuotaStatus, ClassifyError> {
        let lock = self.user_lock(user_id);
        let _held = lock.acquire().await;

        let today = self.clock.today();
        let state = match self.load(user_id).await? {
            Some(mut state) => {
                if state.roll_over(today) {
                    self.save(user_id, state).await?;
                }
                state
            },
            None => UserQuotaState::fresh(today),
        };
        let is_premium = self.store.is_premium(user_id).await.map_err(store_error)?;

        Ok(QuotaStatus {
            used: state.daily_count,
            limit: self.daily_limit,
            remaining: (!is_premium).then(|| self.daily_limit.saturating_sub(state.daily_count)),
            is_premium,
        })
    }

    fn user_lock<'a>(&'a self, user_id: &'a str) -> UserLock<'a> {
        let lock = Arc::clone(self.user_locks.entry(user_id.to_string()).or_default().value());
        UserLock { locks: &self.user_locks, user_id, lock }
    }

    #[cfg(test)]
    pub(super) fn tracked_user_locks(&self) -> usize {
        self.user_locks.len()
    }

    async fn load(&self, user_id: &str) -> Result<Option<UserQuotaState>, ClassifyError> {
        self.store.get_quota_state(user_id).await.map_err(store_error)
    }

    async fn save(&self, user_id: &str, state: UserQuotaState) -> Result<(), ClassifyError> {
        self.store.set_quota_state(user_id, state).await.map_err(store_error)
    }
}

/// Handle on one user's lock. Evicts the table entry on drop when it was the last holder.
struct UserLock<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    user_id: &'a str,
    lock: Arc<Mutex<()>>,
}

impl UserLock<'_> {
    async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for UserLock<'_> {
    fn drop(&mut self) {
        // Two references left: the table's and ours.
        self.locks.remove_if(self.user_id, |_, lock| {
            Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2
        });
    }
}

fn store_error(err: AppError) -> ClassifyError {
    tracing::error!("Quota store failure: {}", err);
    ClassifyError::QuotaStore { message: "quota store unavailable".to_string() }
}
