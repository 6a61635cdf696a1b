//! Readings: one best-effort measurement of a sensor.

use serde::{Deserialize, Serialize};

use crate::sensor::SensorField;

/// A possibly partial measurement produced by a reading source.
///
/// Every field is optional: a failed or partial decode yields missing
/// fields. Readings are consumed once per poll cycle and never retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
    /// Battery level in percent.
    pub battery: Option<f64>,
}

impl Reading {
    /// A reading with every field present.
    #[must_use]
    pub fn new(temperature: f64, humidity: f64, battery: f64) -> Self {
        Self {
            temperature: Some(temperature),
            humidity: Some(humidity),
            battery: Some(battery),
        }
    }

    /// Raw value of one field, before any presence filtering.
    #[must_use]
    pub fn field(&self, field: SensorField) -> Option<f64> {
        match field {
            SensorField::Temperature => self.temperature,
            SensorField::Humidity => self.humidity,
            SensorField::Battery => self.battery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_all_fields_missing() {
        let reading = Reading::default();
        assert_eq!(reading.temperature, None);
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.battery, None);
    }

    #[test]
    fn should_access_fields_by_kind() {
        let reading = Reading::new(21.5, 45.0, 80.0);
        assert_eq!(reading.field(SensorField::Temperature), Some(21.5));
        assert_eq!(reading.field(SensorField::Humidity), Some(45.0));
        assert_eq!(reading.field(SensorField::Battery), Some(80.0));
    }

    #[test]
    fn should_deserialize_partial_reading() {
        let reading: Reading = serde_json::from_str(r#"{"temperature": 19.0}"#).unwrap();
        assert_eq!(reading.temperature, Some(19.0));
        assert_eq!(reading.humidity, None);
    }
}
