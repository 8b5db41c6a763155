//! Per-user daily quota state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Quota bookkeeping owned by the user record.
///
/// `daily_count` only ever goes up, except when [`UserQuotaState::roll_over`]
/// resets it on a new calendar day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserQuotaState {
    pub daily_count: u32,
    pub last_reset_date: NaiveDate,
    pub is_premium: bool,
}

impl UserQuotaState {
    /// State for a user seen for the first time.
    pub const fn fresh(today: NaiveDate) -> Self {
        Self { daily_count: 0, last_reset_date: today, is_premium: false }
    }

    /// Reset the counter if `today` differs from the last reset date.
    /// Returns `true` when a reset happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_reset_date == today {
            return false;
        }
        self.daily_count = 0;
        self.last_reset_date = today;
        true
    }
}

/// Read-only quota summary for the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub used: u32,
    pub limit: u32,
    /// `None` for premium users, who are never limited.
    pub remaining: Option<u32>,
    pub is_premium: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).expect("valid date")
    }

    #[test]
    fn test_roll_over_same_day_keeps_count() {
        let mut state = UserQuotaState { daily_count: 2, last_reset_date: day(1), is_premium: false };
        assert!(!state.roll_over(day(1)));
        assert_eq!(state.daily_count, 2);
    }

    #[test]
    fn test_roll_over_new_day_resets() {
        let mut state = UserQuotaState { daily_count: 3, last_reset_date: day(1), is_premium: true };
        assert!(state.roll_over(day(2)));
        assert_eq!(state.daily_count, 0);
        assert_eq!(state.last_reset_date, day(2));
        assert!(state.is_premium);
    }

    #[test]
    fn test_roll_over_backwards_clock_also_resets() {
        let mut state = UserQuotaState { daily_count: 3, last_reset_date: day(5), is_premium: false };
        assert!(state.roll_over(day(4)));
        assert_eq!(state.daily_count, 0);
    }
}
