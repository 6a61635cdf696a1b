//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `thermohub.toml` in the working directory (or the path named by
//! `THERMOHUB_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.
//!
//! ```toml
//! [platform]
//! variant = "oria"
//!
//! [source]
//! kind = "mqtt"
//!
//! [source.mqtt]
//! broker_host = "192.168.1.10"
//!
//! [[sensors]]
//! name = "Kitchen"
//! macAddress = "AA:BB:CC:DD:EE:FF"
//! ```

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use thermohub_adapter_mqtt::MqttConfig;
use thermohub_adapter_virtual::Profile;
use thermohub_app::services::PollerSettings;
use thermohub_domain::address::MacAddress;
use thermohub_domain::sensor::{SensorIdentity, SensorVariant};

const DEFAULT_PATH: &str = "thermohub.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Platform-wide sensor settings.
    pub platform: PlatformConfig,
    /// Poll loop timing.
    pub poller: PollerConfig,
    /// Where readings come from.
    pub source: SourceConfig,
    /// Configured sensors, in declaration order.
    pub sensors: Vec<SensorEntry>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Settings shared by every configured sensor.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Label used in log lines.
    pub name: String,
    /// Product line of the configured sensors.
    pub variant: SensorVariant,
}

/// Poll loop timing, in seconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    pub interval_secs: u64,
    pub read_timeout_secs: u64,
    pub history_timeout_secs: u64,
}

/// Reading source selection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub mqtt: MqttConfig,
    #[serde(rename = "virtual")]
    pub simulated: VirtualConfig,
}

/// Which [`ReadingSource`](thermohub_app::ports::ReadingSource) to wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Simulated sensors.
    #[default]
    Virtual,
    /// Readings relayed by a BLE-to-MQTT bridge.
    Mqtt,
}

impl std::str::FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "virtual" => Ok(Self::Virtual),
            "mqtt" => Ok(Self::Mqtt),
            other => Err(ConfigError::Validation(format!(
                "unknown source kind {other:?}"
            ))),
        }
    }
}

/// Simulated sensor settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    pub temperature: f64,
    pub humidity: f64,
    pub battery: f64,
    pub swing: f64,
    /// Simulated read latency.
    pub latency_ms: u64,
    /// Every n-th read of a sensor fails.
    pub fail_every: Option<u64>,
    /// Addresses that never answer.
    pub offline: Vec<String>,
}

/// One `[[sensors]]` entry as written in the file.
///
/// Kept loose so that a single malformed entry does not reject the whole
/// file; see [`Config::sensor_identities`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SensorEntry {
    pub name: Option<String>,
    #[serde(alias = "macAddress")]
    pub mac_address: Option<String>,
}

impl Config {
    /// Load configuration from `thermohub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("THERMOHUB_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(val) = var("THERMOHUB_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("THERMOHUB_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Some(val) = var("THERMOHUB_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("THERMOHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("THERMOHUB_SOURCE") {
            self.source.kind = val.parse()?;
        }
        if let Some(val) = var("THERMOHUB_MQTT_HOST") {
            self.source.mqtt.broker_host = val;
        }
        if let Some(val) = var("THERMOHUB_MQTT_PORT")
            && let Ok(port) = val.parse()
        {
            self.source.mqtt.broker_port = port;
        }
        if let Some(val) = var("THERMOHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.poller.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poller.interval_secs must be non-zero".to_string(),
            ));
        }
        if self.poller.read_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "poller.read_timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.poller.history_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "poller.history_timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.source.kind == SourceKind::Mqtt && self.source.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "source.mqtt.broker_port must be non-zero".to_string(),
            ));
        }
        self.source.simulated.offline_addresses()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Poller timing as used by the app layer.
    #[must_use]
    pub fn poller_settings(&self) -> PollerSettings {
        PollerSettings {
            interval: Duration::from_secs(self.poller.interval_secs),
            read_timeout: Duration::from_secs(self.poller.read_timeout_secs),
            history_timeout: Duration::from_secs(self.poller.history_timeout_secs),
        }
    }

    /// The well-formed sensor entries.
    ///
    /// Entries without a name or with a malformed address are logged and
    /// skipped; an empty result is a legitimate configuration.
    #[must_use]
    pub fn sensor_identities(&self) -> Vec<SensorIdentity> {
        self.sensors
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry.identity() {
                Ok(identity) => Some(identity),
                Err(reason) => {
                    tracing::warn!(
                        platform = %self.platform.name,
                        index,
                        reason = %reason,
                        "skipping malformed sensor entry"
                    );
                    None
                }
            })
            .collect()
    }
}

impl SensorEntry {
    fn identity(&self) -> Result<SensorIdentity, String> {
        let name = self.name.as_deref().ok_or("missing name")?;
        let address = self.mac_address.as_deref().ok_or("missing macAddress")?;
        SensorIdentity::new(name, address).map_err(|err| err.to_string())
    }
}

impl VirtualConfig {
    fn offline_addresses(&self) -> Result<HashSet<MacAddress>, ConfigError> {
        self.offline
            .iter()
            .map(|raw| {
                raw.parse()
                    .map_err(|err| ConfigError::Validation(format!("source.virtual.offline: {err}")))
            })
            .collect()
    }

    /// Settings for the virtual reading source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if an offline address is malformed.
    pub fn to_source_config(&self) -> Result<thermohub_adapter_virtual::Config, ConfigError> {
        Ok(thermohub_adapter_virtual::Config {
            profile: Profile {
                temperature: self.temperature,
                humidity: self.humidity,
                battery: self.battery,
                swing: self.swing,
            },
            latency: Duration::from_millis(self.latency_ms),
            fail_every: self.fail_every,
            offline: self.offline_addresses()?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:thermohub.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "thermohubd=info,thermohub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            name: "ThermoBeacon".to_string(),
            variant: SensorVariant::default(),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        let settings = PollerSettings::default();
        Self {
            interval_secs: settings.interval.as_secs(),
            read_timeout_secs: settings.read_timeout.as_secs(),
            history_timeout_secs: settings.history_timeout.as_secs(),
        }
    }
}

impl Default for VirtualConfig {
    fn default() -> Self {
        let profile = Profile::default();
        Self {
            temperature: profile.temperature,
            humidity: profile.humidity,
            battery: profile.battery,
            swing: profile.swing,
            latency_ms: 0,
            fail_every: None,
            offline: Vec::new(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:thermohub.db?mode=rwc");
        assert_eq!(config.platform.variant, SensorVariant::Oria);
        assert_eq!(config.source.kind, SourceKind::Virtual);
        assert!(config.sensors.is_empty());
    }

    #[test]
    fn should_default_to_one_minute_poll_interval() {
        let settings = Config::default().poller_settings();
        assert_eq!(settings, PollerSettings::default());
        assert_eq!(settings.interval, Duration::from_secs(60));
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [platform]
            name = 'Home'
            variant = 'basic'

            [poller]
            interval_secs = 120
            read_timeout_secs = 10
            history_timeout_secs = 2

            [source]
            kind = 'mqtt'

            [source.mqtt]
            broker_host = 'broker.local'
            base_topic = 'ble'

            [[sensors]]
            name = 'Kitchen'
            macAddress = 'AA:BB:CC:DD:EE:FF'

            [[sensors]]
            name = 'Bedroom'
            mac_address = '11-22-33-44-55-66'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.platform.name, "Home");
        assert_eq!(config.platform.variant, SensorVariant::Basic);
        assert_eq!(config.poller_settings().interval, Duration::from_secs(120));
        assert_eq!(config.poller_settings().read_timeout, Duration::from_secs(10));
        assert_eq!(config.poller_settings().history_timeout, Duration::from_secs(2));
        assert_eq!(config.source.kind, SourceKind::Mqtt);
        assert_eq!(config.source.mqtt.broker_host, "broker.local");
        assert_eq!(config.source.mqtt.base_topic, "ble");
        assert_eq!(config.source.mqtt.broker_port, 1883);

        let sensors = config.sensor_identities();
        assert_eq!(sensors.len(), 2);
        assert_eq!(sensors[0].name, "Kitchen");
        assert_eq!(sensors[0].address.to_string(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(sensors[1].address.to_string(), "11:22:33:44:55:66");
    }

    #[test]
    fn should_skip_malformed_sensor_entries() {
        let toml = "
            [[sensors]]
            name = 'Kitchen'
            macAddress = 'AA:BB:CC:DD:EE:FF'

            [[sensors]]
            name = 'Broken'
            macAddress = 'not-a-mac'

            [[sensors]]
            macAddress = '11:22:33:44:55:66'

            [[sensors]]
            name = ''
            macAddress = '11:22:33:44:55:77'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        let sensors = config.sensor_identities();
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0].name, "Kitchen");
    }

    #[test]
    fn should_parse_virtual_source_settings() {
        let toml = "
            [source.virtual]
            temperature = 19.0
            latency_ms = 250
            fail_every = 3
            offline = ['aa:bb:cc:dd:ee:ff']
        ";
        let config: Config = toml::from_str(toml).unwrap();
        let source = config.source.simulated.to_source_config().unwrap();
        assert!((source.profile.temperature - 19.0).abs() < f64::EPSILON);
        assert!((source.profile.humidity - 45.0).abs() < f64::EPSILON);
        assert_eq!(source.latency, Duration::from_millis(250));
        assert_eq!(source.fail_every, Some(3));
        assert!(
            source
                .offline
                .contains(&"AA:BB:CC:DD:EE:FF".parse::<MacAddress>().unwrap())
        );
    }

    #[test]
    fn should_reject_malformed_offline_address() {
        let mut config = Config::default();
        config.source.simulated.offline = vec!["nope".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_interval() {
        let mut config = Config::default();
        config.poller.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_read_timeout() {
        let mut config = Config::default();
        config.poller.read_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_history_timeout() {
        let mut config = Config::default();
        config.poller.history_timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("history_timeout_secs"));
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("THERMOHUB_BIND", "127.0.0.1:8080"),
                ("THERMOHUB_DATABASE_URL", "sqlite::memory:"),
                ("THERMOHUB_SOURCE", "MQTT"),
                ("THERMOHUB_MQTT_HOST", "broker.local"),
                ("THERMOHUB_MQTT_PORT", "8883"),
                ("THERMOHUB_LOG", "warn"),
            ]))
            .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.source.kind, SourceKind::Mqtt);
        assert_eq!(config.source.mqtt.broker_host, "broker.local");
        assert_eq!(config.source.mqtt.broker_port, 8883);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_prefer_rust_log_over_thermohub_log() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("THERMOHUB_LOG", "warn"), ("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_port_override() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("THERMOHUB_PORT", "http")]))
            .unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_unknown_source_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[("THERMOHUB_SOURCE", "zigbee")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_report_parse_error_for_unknown_variant() {
        let result: Result<Config, _> = toml::from_str("[platform]\nvariant = 'pro'");
        assert!(result.is_err());
    }
}
