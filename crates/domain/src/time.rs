//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for stat readings, log entries and action schedules.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whether `when` falls inside the inclusive range `[start, end]`.
#[must_use]
pub fn between(when: Timestamp, start: Timestamp, end: Timestamp) -> bool {
    when >= start && when <= end
}
