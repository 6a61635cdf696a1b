//! Accessory identifiers derived from hardware addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::address::MacAddress;

/// Namespace for deriving [`AccessoryId`]s from hardware addresses.
///
/// Changing this value changes every derived identifier and orphans every
/// cached accessory.
const ACCESSORY_NAMESPACE: uuid::Uuid =
    uuid::Uuid::from_u128(0x6c0b_7e1a_52d4_4f5e_9a3b_1d2e_8f40_c7a9);

/// Stable identifier of a [`LogicalAccessory`](crate::accessory::LogicalAccessory).
///
/// Derived deterministically from the sensor's hardware address, so the
/// same physical sensor maps to the same accessory across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccessoryId(uuid::Uuid);

impl AccessoryId {
    /// Derive the identifier for the given hardware address.
    #[must_use]
    pub fn from_address(address: MacAddress) -> Self {
        Self(uuid::Uuid::new_v5(
            &ACCESSORY_NAMESPACE,
            address.to_string().as_bytes(),
        ))
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccessoryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}
