//! Calendar source for day-boundary logic.

use chrono::{NaiveDate, Utc};

/// Supplies "today". Injected so quota tests can cross midnight.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, UTC calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Manually advanced clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    today: parking_lot::Mutex<NaiveDate>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today: parking_lot::Mutex::new(today) }
    }

    pub fn advance_days(&self, days: u64) {
        let mut guard = self.today.lock();
        *guard = *guard + chrono::Days::new(days);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock()
    }
}
