//! Sensor identities and product variants.

use serde::{Deserialize, Serialize};

use crate::address::MacAddress;
use crate::channel::ChannelKind;
use crate::error::ValidationError;
use crate::id::AccessoryId;

/// A configured sensor: a display name and its hardware address.
///
/// The address is the sole key used to derive the accessory identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorIdentity {
    pub name: String,
    #[serde(alias = "macAddress", alias = "mac_address")]
    pub address: MacAddress,
}

impl SensorIdentity {
    /// Build an identity from raw configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `name` is blank, or
    /// [`ValidationError::InvalidAddress`] when `address` is not a
    /// 6-byte hardware address.
    pub fn new(name: impl Into<String>, address: &str) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            name,
            address: address.parse()?,
        })
    }

    /// The accessory identifier derived from this sensor's address.
    #[must_use]
    pub fn accessory_id(&self) -> AccessoryId {
        AccessoryId::from_address(self.address)
    }
}

/// A measured quantity carried by a [`Reading`](crate::reading::Reading).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorField {
    Temperature,
    Humidity,
    Battery,
}

/// Product line of a sensor, describing which channels it exposes.
///
/// All variants share the same poll/classify/publish skeleton; they differ
/// only in their channel set, their required reading fields and whether
/// samples are appended to history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorVariant {
    /// Thermometer, hygrometer and battery, with history logging.
    #[default]
    Oria,
    /// Thermometer and hygrometer only, no history.
    Basic,
}

impl SensorVariant {
    /// Channels exposed by accessories of this variant.
    #[must_use]
    pub fn channels(self) -> &'static [ChannelKind] {
        match self {
            Self::Oria => &[
                ChannelKind::Thermometer,
                ChannelKind::Hygrometer,
                ChannelKind::Battery,
            ],
            Self::Basic => &[ChannelKind::Thermometer, ChannelKind::Hygrometer],
        }
    }

    /// Reading fields this variant consumes.
    #[must_use]
    pub fn required_fields(self) -> &'static [SensorField] {
        match self {
            Self::Oria => &[
                SensorField::Temperature,
                SensorField::Humidity,
                SensorField::Battery,
            ],
            Self::Basic => &[SensorField::Temperature, SensorField::Humidity],
        }
    }

    /// Whether non-fault samples are appended to the history sink.
    #[must_use]
    pub fn supports_history(self) -> bool {
        matches!(self, Self::Oria)
    }

    /// Whether the given channel carries a low-battery indicator.
    #[must_use]
    pub fn carries_low_battery(self, kind: ChannelKind) -> bool {
        self.has_battery() && self.channels().contains(&kind)
    }

    /// Whether this variant reports a battery level at all.
    #[must_use]
    pub fn has_battery(self) -> bool {
        self.channels().contains(&ChannelKind::Battery)
    }

    /// Manufacturer published on the accessory information service.
    #[must_use]
    pub fn manufacturer(self) -> &'static str {
        "Sensor Blue"
    }

    /// Model published on the accessory information service.
    #[must_use]
    pub fn model(self) -> &'static str {
        match self {
            Self::Oria => "ThermoBeacon oria",
            Self::Basic => "ThermoBeacon",
        }
    }
}
