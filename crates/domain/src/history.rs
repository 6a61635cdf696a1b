//! History: time-series samples appended on every healthy poll.

use serde::{Deserialize, Serialize};

use crate::status::PresentReading;
use crate::time::{Timestamp, epoch_seconds};

/// One sample appended to an accessory's history log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Sample time in seconds since the Unix epoch.
    pub time: i64,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

impl HistoryEntry {
    /// Build an entry from the present fields of a classified reading.
    #[must_use]
    pub fn from_reading(at: Timestamp, reading: &PresentReading) -> Self {
        Self {
            time: epoch_seconds(at),
            temperature: reading.temperature,
            humidity: reading.humidity,
        }
    }
}
