//! # thermohub-adapter-mqtt
//!
//! MQTT reading source: consumes sensor readings relayed by a BLE-to-MQTT
//! bridge.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker and subscribe to `<base_topic>/+`
//! - Decode every message into a [`Reading`] keyed by sensor address
//! - Serve the latest fresh reading per address through [`ReadingSource`]
//!
//! A reading is served only while it is younger than
//! [`MqttConfig::max_age_secs`]; a sensor that went quiet therefore reads as
//! unavailable. A malformed message replaces the cached reading, so the next
//! read reports the payload error.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `thermohub-app` and `thermohub-domain`.

pub mod config;
pub mod error;
pub mod payload;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use thermohub_app::ports::{ReadError, ReadingSource};
use thermohub_domain::address::MacAddress;
use thermohub_domain::reading::Reading;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub use config::MqttConfig;
pub use error::MqttError;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
enum Latest {
    Reading(Reading),
    Malformed(String),
}

/// Latest message received per sensor address.
///
/// Entries older than `max_age` are dropped whenever a new message is
/// recorded, so addresses that stop publishing do not accumulate.
#[derive(Debug, Clone)]
pub struct ReadingCache {
    inner: Arc<RwLock<HashMap<MacAddress, (Instant, Latest)>>>,
    max_age: Duration,
}

impl ReadingCache {
    #[must_use]
    pub fn new(max_age: Duration) -> Self {
        Self {
            inner: Arc::default(),
            max_age,
        }
    }

    /// Store the outcome of one incoming message.
    pub async fn record(&self, address: MacAddress, outcome: Result<Reading, MqttError>) {
        let latest = match outcome {
            Ok(reading) => Latest::Reading(reading),
            Err(err) => Latest::Malformed(err.to_string()),
        };
        let mut guard = self.inner.write().await;
        guard.retain(|_, (at, _)| at.elapsed() <= self.max_age);
        guard.insert(address, (Instant::now(), latest));
    }

    /// The latest reading for an address if it is still fresh.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Unavailable`] when nothing fresh was received and
    /// [`ReadError::Payload`] when the latest message could not be decoded.
    pub async fn latest(&self, address: MacAddress) -> Result<Reading, ReadError> {
        let guard = self.inner.read().await;
        match guard.get(&address) {
            Some((at, latest)) if at.elapsed() <= self.max_age => match latest {
                Latest::Reading(reading) => Ok(*reading),
                Latest::Malformed(message) => Err(ReadError::Payload(message.clone())),
            },
            _ => Err(ReadError::Unavailable(address)),
        }
    }

    /// Number of addresses currently held.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Decode and record one publish packet.
    ///
    /// Messages on topics that do not name a sensor are dropped.
    pub async fn ingest(&self, base_topic: &str, topic: &str, payload: &[u8]) {
        let address = match payload::address_from_topic(base_topic, topic) {
            Ok(address) => address,
            Err(err) => {
                tracing::debug!(topic, error = %err, "ignoring message");
                return;
            }
        };
        let outcome = payload::decode(payload);
        if let Err(err) = &outcome {
            tracing::warn!(%address, error = %err, "malformed sensor payload");
        } else {
            tracing::trace!(%address, "sensor reading received");
        }
        self.record(address, outcome).await;
    }
}

/// [`ReadingSource`] backed by the messages of a BLE-to-MQTT bridge.
pub struct MqttReadingSource {
    cache: ReadingCache,
}

impl MqttReadingSource {
    /// A source reading from an existing cache.
    #[must_use]
    pub fn new(cache: ReadingCache) -> Self {
        Self { cache }
    }

    /// Connect to the broker and start consuming messages.
    ///
    /// The returned task owns the MQTT event loop; it reconnects on errors
    /// and stops when `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] if the subscription request cannot be
    /// queued.
    pub async fn connect(
        config: &MqttConfig,
        cancel: CancellationToken,
    ) -> Result<(Self, JoinHandle<()>), MqttError> {
        let mut options = MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }

        let (client, mut eventloop) = AsyncClient::new(options, 100);
        let subscription = config.subscription();
        client.subscribe(&subscription, QoS::AtMostOnce).await?;
        tracing::info!(
            broker = %config.broker_host,
            port = config.broker_port,
            topic = %subscription,
            "mqtt reading source subscribed"
        );

        let cache = ReadingCache::new(config.max_age());
        let base_topic = config.base_topic.clone();
        let task_cache = cache.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    event = eventloop.poll() => match event {
                        Ok(Event::Incoming(Packet::Publish(publish))) => {
                            task_cache.ingest(&base_topic, &publish.topic, &publish.payload).await;
                        }
                        Ok(Event::Incoming(Packet::ConnAck(_))) => {
                            tracing::info!("mqtt connected");
                            // the broker may have dropped the session
                            if let Err(err) = client.subscribe(&subscription, QoS::AtMostOnce).await {
                                tracing::error!(error = %err, "mqtt re-subscribe failed");
                            }
                        }
                        Ok(_) => {}
                        Err(err) => {
                            tracing::warn!(error = %err, "mqtt connection error, reconnecting");
                            tokio::time::sleep(RECONNECT_DELAY).await;
                        }
                    },
                }
            }
            if let Err(err) = client.disconnect().await {
                tracing::debug!(error = %err, "error disconnecting mqtt client");
            }
            tracing::info!("mqtt reading source stopped");
        });

        Ok((Self::new(cache), task))
    }
}

impl ReadingSource for MqttReadingSource {
    async fn read(&self, address: MacAddress) -> Result<Reading, ReadError> {
        self.cache.latest(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_AGE: Duration = Duration::from_secs(180);

    fn kitchen() -> MacAddress {
        "AA:BB:CC:DD:EE:FF".parse().unwrap()
    }

    #[tokio::test]
    async fn should_be_unavailable_before_any_message() {
        let source = MqttReadingSource::new(ReadingCache::new(MAX_AGE));
        assert!(matches!(
            source.read(kitchen()).await,
            Err(ReadError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn should_serve_latest_ingested_reading() {
        let cache = ReadingCache::new(MAX_AGE);
        let source = MqttReadingSource::new(cache.clone());

        cache
            .ingest("thermobeacon", "thermobeacon/AABBCCDDEEFF", br#"{"te": 20.0, "hu": 50.0, "bt": 90}"#)
            .await;
        cache
            .ingest("thermobeacon", "thermobeacon/AABBCCDDEEFF", br#"{"te": 21.5, "hu": 45.0, "bt": 80}"#)
            .await;

        assert_eq!(source.read(kitchen()).await.unwrap(), Reading::new(21.5, 45.0, 80.0));
    }

    #[tokio::test(start_paused = true)]
    async fn should_expire_stale_reading() {
        let cache = ReadingCache::new(MAX_AGE);
        let source = MqttReadingSource::new(cache.clone());
        cache.record(kitchen(), Ok(Reading::new(21.5, 45.0, 80.0))).await;

        tokio::time::advance(Duration::from_secs(179)).await;
        assert!(source.read(kitchen()).await.is_ok());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(matches!(
            source.read(kitchen()).await,
            Err(ReadError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn should_report_malformed_latest_message() {
        let cache = ReadingCache::new(MAX_AGE);
        let source = MqttReadingSource::new(cache.clone());
        cache
            .ingest("thermobeacon", "thermobeacon/AABBCCDDEEFF", br#"{"te": 21.5}"#)
            .await;
        cache
            .ingest("thermobeacon", "thermobeacon/AABBCCDDEEFF", b"garbage")
            .await;

        assert!(matches!(
            source.read(kitchen()).await,
            Err(ReadError::Payload(_))
        ));
    }

    #[tokio::test]
    async fn should_ignore_messages_on_foreign_topics() {
        let cache = ReadingCache::new(MAX_AGE);
        let source = MqttReadingSource::new(cache.clone());
        cache
            .ingest("thermobeacon", "thermobeacon/bridge/status", br#"{"te": 21.5}"#)
            .await;

        assert!(source.read(kitchen()).await.is_err());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn should_keep_addresses_apart() {
        let cache = ReadingCache::new(MAX_AGE);
        let source = MqttReadingSource::new(cache.clone());
        cache
            .ingest("thermobeacon", "thermobeacon/112233445566", br#"{"te": 18.0}"#)
            .await;

        assert!(source.read(kitchen()).await.is_err());
        let bedroom: MacAddress = "11:22:33:44:55:66".parse().unwrap();
        assert_eq!(source.read(bedroom).await.unwrap().temperature, Some(18.0));
    }

    #[tokio::test(start_paused = true)]
    async fn should_evict_addresses_that_went_quiet() {
        let cache = ReadingCache::new(MAX_AGE);
        for n in 0..500u16 {
            let [hi, lo] = n.to_be_bytes();
            let topic = format!("thermobeacon/02000000{hi:02X}{lo:02X}");
            cache.ingest("thermobeacon", &topic, br#"{"te": 20.0}"#).await;
        }
        assert_eq!(cache.len().await, 500);

        tokio::time::advance(Duration::from_secs(3600)).await;
        cache
            .ingest("thermobeacon", "thermobeacon/AABBCCDDEEFF", br#"{"te": 21.5}"#)
            .await;

        assert_eq!(cache.len().await, 1);
        let source = MqttReadingSource::new(cache);
        assert_eq!(source.read(kitchen()).await.unwrap().temperature, Some(21.5));
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_fresh_entries_when_evicting() {
        let cache = ReadingCache::new(MAX_AGE);
        let bedroom: MacAddress = "11:22:33:44:55:66".parse().unwrap();
        cache.record(bedroom, Ok(Reading::new(18.0, 50.0, 90.0))).await;

        tokio::time::advance(Duration::from_secs(60)).await;
        cache.record(kitchen(), Ok(Reading::new(21.5, 45.0, 80.0))).await;

        assert_eq!(cache.len().await, 2);
        let source = MqttReadingSource::new(cache);
        assert!(source.read(bedroom).await.is_ok());
    }
}
