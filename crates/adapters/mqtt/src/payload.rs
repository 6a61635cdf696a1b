//! Decoding of bridge messages into readings.
//!
//! The bridge publishes one JSON object per advertisement on
//! `<base_topic>/<address>`. The address segment is either the usual
//! colon-separated form or the 12 hex digits without separators.

use serde::Deserialize;
use thermohub_domain::address::MacAddress;
use thermohub_domain::reading::Reading;

use crate::error::MqttError;

/// JSON body of a bridge message.
///
/// Short keys are what common BLE gateways emit for this sensor family.
#[derive(Debug, Default, Deserialize)]
pub struct SensorPayload {
    #[serde(default, alias = "te", alias = "temp")]
    pub temperature: Option<f64>,
    #[serde(default, alias = "hu", alias = "hum")]
    pub humidity: Option<f64>,
    #[serde(default, alias = "bt", alias = "batt")]
    pub battery: Option<f64>,
}

impl From<SensorPayload> for Reading {
    fn from(value: SensorPayload) -> Self {
        Self {
            temperature: value.temperature,
            humidity: value.humidity,
            battery: value.battery,
        }
    }
}

/// Extract the sensor address from a topic below `base_topic`.
///
/// # Errors
///
/// Returns [`MqttError::Topic`] if the topic is not directly below the base
/// topic, or a domain error if the last segment is not an address.
pub fn address_from_topic(base_topic: &str, topic: &str) -> Result<MacAddress, MqttError> {
    let segment = topic
        .strip_prefix(base_topic.trim_end_matches('/'))
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
        .ok_or_else(|| MqttError::Topic(topic.to_string()))?;

    if segment.len() == 12 && segment.chars().all(|c| c.is_ascii_hexdigit()) {
        let pairs: Vec<&str> = (0..6).map(|i| &segment[i * 2..i * 2 + 2]).collect();
        return Ok(pairs.join(":").parse()?);
    }
    Ok(segment.parse()?)
}

/// Decode a message body.
///
/// # Errors
///
/// Returns [`MqttError::PayloadParse`] if the body is not a JSON object with
/// numeric fields.
pub fn decode(payload: &[u8]) -> Result<Reading, MqttError> {
    serde_json::from_slice::<SensorPayload>(payload)
        .map(Reading::from)
        .map_err(MqttError::PayloadParse)
}
