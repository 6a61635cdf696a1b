//! Device poller: one self-rescheduling read loop per accessory.
//!
//! A poller publishes the accessory's static information once when it is
//! attached, then runs a cycle immediately and again every
//! [`PollerSettings::interval`] after the previous cycle completed. Cycles of
//! the same accessory never overlap.

use std::sync::Arc;
use std::time::Duration;

use thermohub_domain::accessory::LogicalAccessory;
use thermohub_domain::channel::{ChannelKind, FaultState, ServiceHandle, ServiceType};
use thermohub_domain::characteristic::Characteristic;
use thermohub_domain::error::ThermohubError;
use thermohub_domain::history::HistoryEntry;
use thermohub_domain::reading::Reading;
use thermohub_domain::sensor::SensorVariant;
use thermohub_domain::status::{Classification, PresentReading, classify};
use thermohub_domain::time;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::ports::{CharacteristicStore, HistorySink, ReadError, ReadingSource};

/// Timing knobs of a poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerSettings {
    /// Delay between the end of one cycle and the start of the next.
    pub interval: Duration,
    /// Upper bound on a single sensor read.
    pub read_timeout: Duration,
    /// Upper bound on a single history append.
    pub history_timeout: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            read_timeout: Duration::from_secs(30),
            history_timeout: Duration::from_secs(5),
        }
    }
}

/// The ports a poller needs, shared by every poller of a fleet.
pub struct PollerContext<S, C, H> {
    source: Arc<S>,
    store: Arc<C>,
    history: Arc<H>,
    settings: PollerSettings,
}

impl<S, C, H> PollerContext<S, C, H> {
    pub fn new(source: Arc<S>, store: Arc<C>, history: Arc<H>, settings: PollerSettings) -> Self {
        Self {
            source,
            store,
            history,
            settings,
        }
    }
}

impl<S, C, H> Clone for PollerContext<S, C, H> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
            history: Arc::clone(&self.history),
            settings: self.settings,
        }
    }
}

/// What a single cycle published.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleReport {
    /// The read failed or returned nothing usable.
    Faulted,
    /// At least one field was present and has been published.
    Published(PresentReading),
}

/// Polls one sensor and publishes the outcome on its accessory's channels.
pub struct DevicePoller<S, C, H> {
    accessory: LogicalAccessory,
    variant: SensorVariant,
    channels: Vec<(ChannelKind, ServiceHandle)>,
    ctx: PollerContext<S, C, H>,
}

impl<S, C, H> DevicePoller<S, C, H>
where
    S: ReadingSource + 'static,
    C: CharacteristicStore + 'static,
    H: HistorySink + 'static,
{
    /// Bind a poller to an accessory.
    ///
    /// Publishes the accessory information (manufacturer, model, serial
    /// number) and makes sure one service exists per channel of the variant,
    /// each carrying the accessory display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the characteristic store rejects a service or
    /// one of the static characteristics.
    #[tracing::instrument(skip_all, fields(accessory = %accessory.display_name))]
    pub async fn attach(
        accessory: LogicalAccessory,
        variant: SensorVariant,
        ctx: PollerContext<S, C, H>,
    ) -> Result<Self, ThermohubError> {
        let info = ctx
            .store
            .service(accessory.id, ServiceType::AccessoryInformation)
            .await?;
        let static_info = [
            Characteristic::Name(accessory.display_name.clone()),
            Characteristic::Manufacturer(variant.manufacturer().to_string()),
            Characteristic::Model(variant.model().to_string()),
            Characteristic::SerialNumber(accessory.context.address.to_string()),
        ];
        for value in static_info {
            ctx.store.update_characteristic(info, value).await?;
        }

        let mut channels = Vec::with_capacity(variant.channels().len());
        for kind in variant.channels() {
            let handle = ctx.store.service(accessory.id, kind.service_type()).await?;
            ctx.store
                .update_characteristic(handle, Characteristic::Name(accessory.display_name.clone()))
                .await?;
            channels.push((*kind, handle));
        }

        tracing::debug!(channels = channels.len(), "accessory attached");
        Ok(Self {
            accessory,
            variant,
            channels,
            ctx,
        })
    }

    /// Run one read-classify-publish cycle.
    ///
    /// Never fails: read errors become a fault status, and publish or
    /// history errors are logged and skipped.
    #[tracing::instrument(skip(self), fields(accessory = %self.accessory.display_name))]
    pub async fn run_cycle(&self) -> CycleReport {
        let reading = self.read().await;
        match classify(reading.as_ref(), self.variant) {
            Classification::AllFault => {
                tracing::warn!("unable to read the sensor");
                self.publish_fault().await;
                CycleReport::Faulted
            }
            Classification::Partial(present) => {
                tracing::info!(
                    temperature = ?present.temperature,
                    humidity = ?present.humidity,
                    battery = ?present.battery,
                    "sensor read"
                );
                self.publish_reading(&present).await;
                self.append_history(&present).await;
                CycleReport::Published(present)
            }
        }
    }

    /// Start the loop on the runtime.
    ///
    /// The first cycle runs immediately. The loop ends once `cancel` fires;
    /// an in-flight cycle is completed first.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(self, cancel: CancellationToken) {
        loop {
            self.run_cycle().await;
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.ctx.settings.interval) => {}
            }
        }
        tracing::debug!(accessory = %self.accessory.display_name, "poller stopped");
    }

    async fn read(&self) -> Option<Reading> {
        let timeout = self.ctx.settings.read_timeout;
        let address = self.accessory.context.address;
        let result = tokio::time::timeout(timeout, self.ctx.source.read(address))
            .await
            .unwrap_or(Err(ReadError::Timeout(timeout)));
        match result {
            Ok(reading) => Some(reading),
            Err(err) => {
                tracing::debug!(%address, error = %err, "read failed");
                None
            }
        }
    }

    async fn publish_fault(&self) {
        for (kind, handle) in &self.channels {
            if kind.carries_fault() {
                self.publish(*handle, Characteristic::StatusFault(FaultState::GeneralFault))
                    .await;
            }
        }
    }

    async fn publish_reading(&self, present: &PresentReading) {
        for (kind, handle) in &self.channels {
            let value = match kind {
                ChannelKind::Thermometer => present.temperature.map(Characteristic::CurrentTemperature),
                ChannelKind::Hygrometer => present.humidity.map(Characteristic::CurrentRelativeHumidity),
                ChannelKind::Battery => present.battery.map(Characteristic::BatteryLevel),
            };
            if let Some(value) = value {
                self.publish(*handle, value).await;
            }
            if kind.carries_fault() {
                self.publish(*handle, Characteristic::StatusFault(FaultState::NoFault))
                    .await;
            }
            if self.variant.carries_low_battery(*kind) {
                self.publish(*handle, Characteristic::StatusLowBattery(present.low_battery()))
                    .await;
            }
        }
    }

    async fn publish(&self, handle: ServiceHandle, value: Characteristic) {
        let characteristic = value.name();
        if let Err(err) = self.ctx.store.update_characteristic(handle, value).await {
            tracing::warn!(
                service = %handle.service_type,
                characteristic,
                error = %err,
                "failed to publish characteristic"
            );
        }
    }

    async fn append_history(&self, present: &PresentReading) {
        if !self.variant.supports_history() {
            return;
        }
        let entry = HistoryEntry::from_reading(time::now(), present);
        let append = self.ctx.history.append(self.accessory.id, entry);
        match tokio::time::timeout(self.ctx.settings.history_timeout, append).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!(error = %err, "failed to append history entry"),
            Err(_) => tracing::warn!(
                timeout = ?self.ctx.settings.history_timeout,
                "history append timed out"
            ),
        }
    }
}
