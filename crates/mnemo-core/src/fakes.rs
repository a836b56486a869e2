//! Fake implementations for testing.
#![allow(clippy::unwrap_used)]

use crate::clock::Clock;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// FixedClock
// ---------------------------------------------------------------------------

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    /// Parse an RFC 3339 instant, panicking on bad input.
    pub fn at(rfc3339: &str) -> Self {
        let at = DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc);
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

// ---------------------------------------------------------------------------
// StepClock
// ---------------------------------------------------------------------------

/// Clock that advances by a fixed step on every read.
#[derive(Debug)]
pub struct StepClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl StepClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    /// One-second steps starting at the given RFC 3339 instant.
    pub fn seconds_from(rfc3339: &str) -> Self {
        Self::new(FixedClock::at(rfc3339).at, Duration::seconds(1))
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + self.step;
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::format_marker_timestamp;

    #[test]
    fn fixed_clock_never_moves() {
        let clock = FixedClock::at("2024-01-01T12:00:00Z");
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn step_clock_is_monotonic() {
        let clock = StepClock::seconds_from("2024-01-01T12:00:00Z");
        assert_eq!(format_marker_timestamp(clock.now()), "2024-01-01 12:00:00");
        assert_eq!(format_marker_timestamp(clock.now()), "2024-01-01 12:00:01");
        assert!(clock.now() < clock.now());
    }
}
