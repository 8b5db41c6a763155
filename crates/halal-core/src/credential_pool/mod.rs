//! Pool of interchangeable inference credentials.
//!
//! Selection is uniform-random among credentials not excluded by the caller
//! and not cooling down. A credential that failed recently is deprioritized,
//! not removed: when every candidate is cooling down, the one whose cool-down
//! ends soonest is handed out.
//!
//! All bookkeeping sits behind one mutex that is held only for the
//! selection/update itself, never across a network call.

mod cooldown;
mod credential;


pub use cooldown::CooldownPolicy;
pub use credential::{ApiKey, CredentialLease};

use cooldown::FailureState;
use credential::Credential;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Every credential in the pool is in the caller's exclusion set.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("credential pool exhausted")]
pub struct PoolExhausted;

pub struct CredentialPool {
    credentials: Vec<Credential>,
    failures: Mutex<Vec<FailureState>>,
    policy: CooldownPolicy,
}

impl CredentialPool {
    /// Build a pool labelling keys `key-1`, `key-2`, … in the given order.
    pub fn new<I, S>(keys: I, policy: CooldownPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let credentials: Vec<Credential> = keys
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| Credential { id: format!("key-{}", idx + 1), key: ApiKey::new(raw) })
            .collect();
        let failures = Mutex::new(vec![FailureState::default(); credentials.len()]);

        tracing::info!("Credential pool initialized with {} key(s)", credentials.len());
        Self { credentials, failures, policy }
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Pick a credential whose label is not in `excluding`.
    pub fn acquire(&self, excluding: &HashSet<String>) -> Result<CredentialLease, PoolExhausted> {
        let failures = self.failures.lock();
        let now = Instant::now();

        let candidates: Vec<usize> = self
            .credentials
            .iter()
            .enumerate()
            .filter(|(_, c)| !excluding.contains(&c.id))
            .map(|(idx, _)| idx)
            .collect();

        if candidates.is_empty() {
            return Err(PoolExhausted);
        }

        let ready: Vec<usize> =
            candidates.iter().copied().filter(|&idx| !failures[idx].is_cooling(now)).collect();

        let chosen = match ready.choose(&mut rand::thread_rng()) {
            Some(&idx) => idx,
            None => {
                // Everything left is cooling down; take whichever recovers first.
                let idx = candidates
                    .iter()
                    .copied()
                    .min_by_key(|&idx| failures[idx].cooldown_until)
                    .ok_or(PoolExhausted)?;
                tracing::debug!(
                    credential = %self.credentials[idx].id,
                    "All candidate credentials cooling down, using earliest to recover"
                );
                idx
            },
        };

        Ok(CredentialLease::from_credential(&self.credentials[chosen]))
    }

    /// Record a failed attempt. `retry_after` is the provider's hint, if any.
    pub fn report_failure(&self, id: &str, retry_after: Option<Duration>) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        let mut failures = self.failures.lock();
        let state = &mut failures[idx];
        let cooldown = state.record_failure(Instant::now(), &self.policy, retry_after);
        tracing::debug!(
            credential = %id,
            consecutive_failures = state.consecutive_failures,
            "Credential cooling down for {}s",
            cooldown.as_secs()
        );
    }

    /// Clear failure bookkeeping after a successful attempt.
    pub fn report_success(&self, id: &str) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        let mut failures = self.failures.lock();
        if failures[idx].consecutive_failures > 0 {
            tracing::debug!(credential = %id, "Credential recovered, failure count reset");
        }
        failures[idx].reset();
    }

    /// Number of credentials not currently cooling down.
    pub fn available_count(&self) -> usize {
        let now = Instant::now();
        self.failures.lock().iter().filter(|f| !f.is_cooling(now)).count()
    }

    /// Consecutive failures recorded against a credential label.
    pub fn failure_count(&self, id: &str) -> Option<u32> {
        let idx = self.index_of(id)?;
        Some(self.failures.lock()[idx].consecutive_failures)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.credentials.iter().map(|c| c.id.as_str())
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.credentials.iter().position(|c| c.id == id)
    }
}

impl std::fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPool")
            .field("size", &self.credentials.len())
            .field("policy", &self.policy)
            .finish()
    }
}
