//! # thermohub-adapter-virtual
//!
//! Virtual reading source that simulates thermo-hygrometers for testing and
//! demonstration purposes.
//!
//! Every address gets its own [`VirtualSensor`] on first read, seeded from the
//! configured [`Profile`]. Addresses listed as offline never answer, and a
//! periodic failure rate can be configured to exercise the fault path.
//!
//! ## Dependency rule
//!
//! Depends on `thermohub-app` (port traits) and `thermohub-domain` only.

mod sensor;

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use thermohub_app::ports::{ReadError, ReadingSource};
use thermohub_domain::address::MacAddress;
use thermohub_domain::reading::Reading;
use tokio::sync::Mutex;

pub use sensor::{Profile, VirtualSensor};

/// Configuration of the virtual reading source.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub profile: Profile,
    /// Simulated time a read takes.
    pub latency: Duration,
    /// Every n-th read of an address fails; `None` or `0` disables failures.
    pub fail_every: Option<u64>,
    /// Addresses that never answer.
    pub offline: HashSet<MacAddress>,
}

/// [`ReadingSource`] backed by simulated sensors.
pub struct VirtualReadingSource {
    config: Config,
    sensors: Mutex<HashMap<MacAddress, VirtualSensor>>,
}

impl VirtualReadingSource {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sensors: Mutex::new(HashMap::new()),
        }
    }

    fn should_fail(&self, attempt: u64) -> bool {
        match self.config.fail_every {
            Some(every) if every > 0 => attempt % every == 0,
            _ => false,
        }
    }
}

impl Default for VirtualReadingSource {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ReadingSource for VirtualReadingSource {
    async fn read(&self, address: MacAddress) -> Result<Reading, ReadError> {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        if self.config.offline.contains(&address) {
            tracing::debug!(%address, "virtual sensor offline");
            return Err(ReadError::Unavailable(address));
        }

        let mut sensors = self.sensors.lock().await;
        let sensor = sensors
            .entry(address)
            .or_insert_with(|| VirtualSensor::new(self.config.profile));
        let attempt = sensor.reads() + 1;
        let reading = sensor.next_reading();

        if self.should_fail(attempt) {
            tracing::debug!(%address, attempt, "simulated read failure");
            return Err(ReadError::Transport("simulated radio failure".into()));
        }

        Ok(reading)
    }
}
