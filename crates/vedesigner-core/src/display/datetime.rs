//! Timestamp display utilities.
//!
//! Plan documents carry their timestamps as strings. The API writes naive
//! `YYYY-MM-DDTHH:MM:SS` values, the local store writes RFC 3339 instants.

use std::fmt;

use jiff::{civil::DateTime, tz::TimeZone, Timestamp};

/// Formats a plan timestamp string for humans.
///
/// Instants are shown in the system timezone as `YYYY-MM-DD HH:MM:SS TZ`,
/// naive datetimes as `YYYY-MM-DD HH:MM`. Anything else is shown as-is.
///
/// ```rust
/// use vedesigner_core::display::PlanTimestamp;
///
/// assert_eq!(PlanTimestamp("2024-03-01T09:30:00").to_string(), "2024-03-01 09:30");
/// assert_eq!(PlanTimestamp("yesterday").to_string(), "yesterday");
/// ```
pub struct PlanTimestamp<'a>(pub &'a str);

impl fmt::Display for PlanTimestamp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Ok(instant) = self.0.parse::<Timestamp>() {
            return write!(
                f,
                "{}",
                instant
                    .to_zoned(TimeZone::system())
                    .strftime("%Y-%m-%d %H:%M:%S %Z")
            );
        }
        if let Ok(naive) = self.0.parse::<DateTime>() {
            return write!(f, "{}", naive.strftime("%Y-%m-%d %H:%M"));
        }
        f.write_str(self.0)
    }
}
