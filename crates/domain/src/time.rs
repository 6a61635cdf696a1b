//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for `updated_at`, `created_at`, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Seconds since the Unix epoch, rounded to the nearest second.
#[must_use]
pub fn epoch_seconds(ts: Timestamp) -> i64 {
    (ts.timestamp_millis() + 500).div_euclid(1000)
}
