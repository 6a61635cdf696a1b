//! Status classification: maps a poll outcome to what gets published.
//!
//! A field counts as *present* only when it is a non-zero, non-NaN number.
//! A genuine `0` (0 °C, 0 % humidity, empty battery) is therefore treated
//! as missing.
//!
//! The outcome is all-or-nothing on the fault side: as soon as one field the
//! variant consumes is present, the whole accessory is considered healthy
//! and every channel's fault indicator is cleared, even channels whose own
//! value is still missing.

use crate::channel::LowBatteryState;
use crate::reading::Reading;
use crate::sensor::{SensorField, SensorVariant};

/// Battery percentage at or below which the low-battery indicator is raised.
pub const LOW_BATTERY_THRESHOLD: f64 = 10.0;

/// The present subset of a reading, restricted to a variant's fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PresentReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub battery: Option<f64>,
}

impl PresentReading {
    /// Low-battery indicator derived from the present battery level.
    #[must_use]
    pub fn low_battery(&self) -> LowBatteryState {
        low_battery_state(self.battery)
    }

    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.humidity.is_none() && self.battery.is_none()
    }
}

/// Result of classifying one poll outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    /// The read failed, or every field the variant consumes is absent.
    AllFault,
    /// At least one consumed field is present.
    Partial(PresentReading),
}

impl Classification {
    #[must_use]
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::AllFault)
    }
}

/// Classify a poll outcome for the given variant.
///
/// `None` stands for a failed read (transport error, timeout, bad payload).
#[must_use]
pub fn classify(reading: Option<&Reading>, variant: SensorVariant) -> Classification {
    let Some(reading) = reading else {
        return Classification::AllFault;
    };

    let pick = |field: SensorField| {
        if variant.required_fields().contains(&field) {
            present(reading.field(field))
        } else {
            None
        }
    };

    let kept = PresentReading {
        temperature: pick(SensorField::Temperature),
        humidity: pick(SensorField::Humidity),
        battery: pick(SensorField::Battery),
    };

    if kept.is_empty() {
        Classification::AllFault
    } else {
        Classification::Partial(kept)
    }
}

/// Low-battery indicator for a battery level.
///
/// A missing level reports [`LowBatteryState::Normal`].
#[must_use]
pub fn low_battery_state(battery: Option<f64>) -> LowBatteryState {
    match battery {
        Some(level) if level <= LOW_BATTERY_THRESHOLD => LowBatteryState::Low,
        _ => LowBatteryState::Normal,
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}
