//! Typed characteristic values published on host services.

use serde::{Deserialize, Serialize};

use crate::channel::{FaultState, LowBatteryState};

/// A single characteristic value.
///
/// The host store keys characteristics by `(accessory, service, name)`, so
/// publishing the same characteristic twice overwrites the previous value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "characteristic", content = "value", rename_all = "snake_case")]
pub enum Characteristic {
    Name(String),
    Manufacturer(String),
    Model(String),
    SerialNumber(String),
    CurrentTemperature(f64),
    CurrentRelativeHumidity(f64),
    BatteryLevel(f64),
    StatusFault(FaultState),
    StatusLowBattery(LowBatteryState),
}

impl Characteristic {
    /// Stable characteristic name used as the storage key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Manufacturer(_) => "manufacturer",
            Self::Model(_) => "model",
            Self::SerialNumber(_) => "serial_number",
            Self::CurrentTemperature(_) => "current_temperature",
            Self::CurrentRelativeHumidity(_) => "current_relative_humidity",
            Self::BatteryLevel(_) => "battery_level",
            Self::StatusFault(_) => "status_fault",
            Self::StatusLowBattery(_) => "status_low_battery",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_with_characteristic_tag() {
        let json = serde_json::to_value(Characteristic::CurrentTemperature(21.5)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"characteristic": "current_temperature", "value": 21.5})
        );
    }

    #[test]
    fn should_serialize_fault_state_in_snake_case() {
        let json =
            serde_json::to_value(Characteristic::StatusFault(FaultState::GeneralFault)).unwrap();
        assert_eq!(json["value"], "general_fault");
    }

    #[test]
    fn should_match_name_with_serde_tag() {
        let value = Characteristic::StatusLowBattery(LowBatteryState::Low);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["characteristic"], value.name());
    }

    #[test]
    fn should_deserialize_stored_value() {
        let json = r#"{"characteristic":"serial_number","value":"AA:BB:CC:DD:EE:FF"}"#;
        let value: Characteristic = serde_json::from_str(json).unwrap();
        assert_eq!(
            value,
            Characteristic::SerialNumber("AA:BB:CC:DD:EE:FF".to_string())
        );
    }
}
