//! Clock capability.
//!
//! # Invariants
//! - Managers obtain every timestamp through this seam; two `now()` calls
//!   against an unadvanced `ManualClock` return identical values.
//! - `ManualClock` only moves forward.

use chrono::{Duration, NaiveDateTime, Utc};
use std::sync::Mutex;

/// Supplies the current timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Production clock reading the system wall clock (UTC).
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Controllable clock for deterministic tests.
///
/// Holds an internal timestamp seeded at construction; `advance` moves it
/// forward by the given duration and is the only mutation path.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(fixed_time: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(fixed_time),
        }
    }

    /// Moves the clock forward. `std::time::Duration` is non-negative by
    /// construction, so the clock can never move backward.
    pub fn advance(&self, delta: std::time::Duration) {
        let delta = Duration::from_std(delta).unwrap_or_else(|_| Duration::max_value());
        let mut now = self
            .now
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *now = now.checked_add_signed(delta).unwrap_or(NaiveDateTime::MAX);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self
            .now
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn seed() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 2)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    #[test]
    fn unadvanced_clock_is_frozen() {
        let clock = ManualClock::new(seed());
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), seed());
    }

    #[test]
    fn advance_moves_forward_by_exact_delta() {
        let clock = ManualClock::new(seed());
        clock.advance(Duration::from_secs(5 * 3600));
        assert_eq!(clock.now(), seed() + chrono::Duration::hours(5));
    }
}
