//! MQTT reading source configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the MQTT reading source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Topic prefix the bridge publishes readings under, one sub-topic per
    /// sensor address.
    pub base_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Readings older than this are not served, in seconds.
    pub max_age_secs: u64,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "thermohub".to_string(),
            base_topic: "thermobeacon".to_string(),
            keep_alive_secs: 30,
            max_age_secs: 180,
            username: None,
            password: None,
        }
    }
}

impl MqttConfig {
    /// Wildcard subscription matching every sensor topic.
    #[must_use]
    pub fn subscription(&self) -> String {
        format!("{}/+", self.base_topic.trim_end_matches('/'))
    }

    #[must_use]
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}
