//! Bluetooth hardware address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A 6-byte Bluetooth device address.
///
/// Parses `AA:BB:CC:DD:EE:FF` and `aa-bb-cc-dd-ee-ff` (case-insensitive) and
/// always displays as upper-case, colon-separated hex. Two spellings of the
/// same hardware address therefore compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl FromStr for MacAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidAddress {
            value: s.to_string(),
        };

        let trimmed = s.trim();
        let separator = if trimmed.contains('-') { '-' } else { ':' };

        let mut bytes = [0u8; 6];
        let mut parts = trimmed.split(separator);
        for byte in &mut bytes {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self(bytes))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_colon_separated_address() {
        let mac: MacAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        assert_eq!(mac.to_string(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn should_parse_lower_case_dash_separated_address() {
        let mac: MacAddress = "a4-c1-38-5b-0e-df".parse().unwrap();
        assert_eq!(mac.to_string(), "A4:C1:38:5B:0E:DF");
    }

    #[test]
    fn should_treat_different_spellings_as_equal() {
        let upper: MacAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        let lower: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn should_reject_short_address() {
        let result = MacAddress::from_str("AA:BB:CC:DD:EE");
        assert!(matches!(
            result,
            Err(ValidationError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn should_reject_long_address() {
        assert!(MacAddress::from_str("AA:BB:CC:DD:EE:FF:00").is_err());
    }

    #[test]
    fn should_reject_non_hex_octet() {
        assert!(MacAddress::from_str("ZZ:BB:CC:DD:EE:FF").is_err());
    }

    #[test]
    fn should_reject_empty_string() {
        assert!(MacAddress::from_str("").is_err());
    }

    #[test]
    fn should_reject_signed_octet() {
        assert!(MacAddress::from_str("+A:BB:CC:DD:EE:FF").is_err());
        assert!(MacAddress::from_str("AA:BB:CC:DD:EE:+F").is_err());
    }

    #[test]
    fn should_reject_mixed_separators() {
        assert!(MacAddress::from_str("AA-BB:CC-DD:EE-FF").is_err());
    }

    #[test]
    fn should_serialize_as_canonical_string() {
        let mac: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"AA:BB:CC:DD:EE:FF\"");
        let back: MacAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mac);
    }
}
