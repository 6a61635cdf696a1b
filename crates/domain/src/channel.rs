//! Channels: the published sensor/battery slots of an accessory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::characteristic::Characteristic;
use crate::id::AccessoryId;

/// One exposed measurement slot of an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Thermometer,
    Hygrometer,
    Battery,
}

impl ChannelKind {
    /// The host service type backing this channel.
    #[must_use]
    pub fn service_type(self) -> ServiceType {
        match self {
            Self::Thermometer => ServiceType::TemperatureSensor,
            Self::Hygrometer => ServiceType::HumiditySensor,
            Self::Battery => ServiceType::Battery,
        }
    }

    /// Whether the channel exposes a `StatusFault` characteristic.
    ///
    /// The host's battery service has no fault indicator.
    #[must_use]
    pub fn carries_fault(self) -> bool {
        !matches!(self, Self::Battery)
    }
}

/// Host-side service grouping of characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    AccessoryInformation,
    TemperatureSensor,
    HumiditySensor,
    Battery,
}

impl ServiceType {
    /// Stable string form used for persistence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessoryInformation => "accessory_information",
            Self::TemperatureSensor => "temperature_sensor",
            Self::HumiditySensor => "humidity_sensor",
            Self::Battery => "battery",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored service type string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service type {0:?}")]
pub struct UnknownServiceType(pub String);

impl FromStr for ServiceType {
    type Err = UnknownServiceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accessory_information" => Ok(Self::AccessoryInformation),
            "temperature_sensor" => Ok(Self::TemperatureSensor),
            "humidity_sensor" => Ok(Self::HumiditySensor),
            "battery" => Ok(Self::Battery),
            other => Err(UnknownServiceType(other.to_string())),
        }
    }
}

/// Typed handle to one service of one accessory.
///
/// Obtained from the characteristic store's get-or-create accessor, so a
/// handle always refers to a service that exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceHandle {
    pub accessory_id: AccessoryId,
    pub service_type: ServiceType,
}

impl ServiceHandle {
    #[must_use]
    pub fn new(accessory_id: AccessoryId, service_type: ServiceType) -> Self {
        Self {
            accessory_id,
            service_type,
        }
    }
}

/// Fault indicator of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultState {
    #[default]
    NoFault,
    GeneralFault,
}

/// Low-battery indicator of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowBatteryState {
    #[default]
    Normal,
    Low,
}

/// Summary status of a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    Fault,
    LowBattery,
    Normal,
}

/// Snapshot of one channel, rebuilt from its published characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelState {
    pub kind: ChannelKind,
    pub value: Option<f64>,
    pub fault: Option<FaultState>,
    pub low_battery: Option<LowBatteryState>,
}

impl ChannelState {
    /// Fold the characteristics of a channel's service into a snapshot.
    ///
    /// Characteristics that do not belong to the channel are ignored.
    #[must_use]
    pub fn from_characteristics<'a>(
        kind: ChannelKind,
        characteristics: impl IntoIterator<Item = &'a Characteristic>,
    ) -> Self {
        let mut state = Self {
            kind,
            value: None,
            fault: None,
            low_battery: None,
        };
        for characteristic in characteristics {
            match (kind, characteristic) {
                (ChannelKind::Thermometer, Characteristic::CurrentTemperature(v))
                | (ChannelKind::Hygrometer, Characteristic::CurrentRelativeHumidity(v))
                | (ChannelKind::Battery, Characteristic::BatteryLevel(v)) => {
                    state.value = Some(*v);
                }
                (_, Characteristic::StatusFault(fault)) => state.fault = Some(*fault),
                (_, Characteristic::StatusLowBattery(low)) => state.low_battery = Some(*low),
                _ => {}
            }
        }
        state
    }

    /// Derived status: a fault wins over low battery, which wins over normal.
    #[must_use]
    pub fn status(&self) -> SensorStatus {
        if self.fault == Some(FaultState::GeneralFault) {
            SensorStatus::Fault
        } else if self.low_battery == Some(LowBatteryState::Low) {
            SensorStatus::LowBattery
        } else {
            SensorStatus::Normal
        }
    }
}
