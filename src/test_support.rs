//! Helpers shared across module test suites.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;

/// Deterministic clock that only moves when a test advances it.
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(crate) fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub(crate) fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += duration;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
