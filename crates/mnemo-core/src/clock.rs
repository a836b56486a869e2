use chrono::{DateTime, Utc};

/// Source of wall-clock time for timestamp markers and the default daily date.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Second-granularity, zone-free rendering used inside `<!-- ... -->` markers.
pub fn format_marker_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn marker_timestamp_has_no_zone_or_fraction() {
        let at = Utc
            .with_ymd_and_hms(2024, 3, 5, 9, 7, 1)
            .unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(format_marker_timestamp(at), "2024-03-05 09:07:01");
    }
}
