use std::time::Duration;
use tokio::time::Instant;

/// Failure counts older than this start over from zero.
const FAILURE_COUNT_EXPIRY: Duration = Duration::from_secs(3600);

/// Provider-supplied retry hints are honoured up to this bound.
const RETRY_AFTER_CAP: Duration = Duration::from_secs(600);

/// Cool-down progression for failing credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    pub base: Duration,
    pub max: Duration,
}

impl CooldownPolicy {
    pub const fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    /// base → 2·base → 4·base … capped at `max`.
    pub fn for_failures(&self, consecutive_failures: u32) -> Duration {
        let exponent = consecutive_failures.saturating_sub(1).min(16);
        self.base.saturating_mul(1_u32 << exponent).min(self.max)
    }
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(60))
    }
}

/// Failure bookkeeping for one credential.
#[derive(Debug, Clone, Default)]
pub(super) struct FailureState {
    pub(super) consecutive_failures: u32,
    pub(super) last_failure: Option<Instant>,
    pub(super) cooldown_until: Option<Instant>,
}

impl FailureState {
    pub(super) fn is_cooling(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| until > now)
    }

    /// Record a failure and return the cool-down applied.
    pub(super) fn record_failure(
        &mut self,
        now: Instant,
        policy: &CooldownPolicy,
        retry_after: Option<Duration>,
    ) -> Duration {
        let expired = self
            .last_failure
            .is_some_and(|last| now.saturating_duration_since(last) > FAILURE_COUNT_EXPIRY);
        if expired {
            self.consecutive_failures = 0;
        }

        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_failure = Some(now);

        let adaptive = policy.for_failures(self.consecutive_failures);
        let cooldown = retry_after.map_or(adaptive, |hint| adaptive.max(hint.min(RETRY_AFTER_CAP)));
        self.cooldown_until = Some(now + cooldown);
        cooldown
    }

    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }
}
