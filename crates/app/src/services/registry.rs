//! Accessory registry: reconciles configured sensors with cached accessories.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thermohub_domain::accessory::LogicalAccessory;
use thermohub_domain::error::ThermohubError;
use thermohub_domain::id::AccessoryId;
use thermohub_domain::sensor::{SensorIdentity, SensorVariant};
use tokio_util::sync::CancellationToken;

use crate::ports::{AccessoryRepository, CharacteristicStore, HistorySink, ReadingSource};
use crate::services::fleet::PollerFleet;
use crate::services::poller::{DevicePoller, PollerContext};

/// How a configured sensor ended up with an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Found in the cache and reused as is.
    Restored,
    /// Created and registered during this reconciliation.
    Created,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub accessory: LogicalAccessory,
    pub origin: Origin,
}

/// Maps configured sensors to logical accessories and starts their pollers.
pub struct AccessoryRegistry<R, S, C, H> {
    repo: Arc<R>,
    variant: SensorVariant,
    ctx: PollerContext<S, C, H>,
}

impl<R, S, C, H> AccessoryRegistry<R, S, C, H>
where
    R: AccessoryRepository + 'static,
    S: ReadingSource + 'static,
    C: CharacteristicStore + 'static,
    H: HistorySink + 'static,
{
    pub fn new(repo: Arc<R>, variant: SensorVariant, ctx: PollerContext<S, C, H>) -> Self {
        Self { repo, variant, ctx }
    }

    /// Resolve every configured sensor to exactly one accessory.
    ///
    /// A cached accessory whose id matches is reused untouched (its display
    /// name wins over the configured one). Otherwise a new accessory is
    /// created and registered with the repository. Registration failures
    /// are logged and the sensor is skipped. Cached accessories that are no
    /// longer configured are left alone.
    #[tracing::instrument(skip_all, fields(configured = configured.len(), cached = cached.len()))]
    pub async fn reconcile(
        &self,
        configured: &[SensorIdentity],
        cached: &[LogicalAccessory],
    ) -> Vec<Reconciled> {
        let by_id: HashMap<AccessoryId, &LogicalAccessory> =
            cached.iter().map(|accessory| (accessory.id, accessory)).collect();
        let mut seen = HashSet::with_capacity(configured.len());
        let mut reconciled = Vec::with_capacity(configured.len());

        for identity in configured {
            let id = identity.accessory_id();
            if !seen.insert(id) {
                tracing::warn!(
                    name = %identity.name,
                    address = %identity.address,
                    "sensor address configured more than once, ignoring duplicate"
                );
                continue;
            }

            if let Some(existing) = by_id.get(&id) {
                tracing::info!(accessory = %existing.display_name, "restoring existing accessory from cache");
                reconciled.push(Reconciled {
                    accessory: (*existing).clone(),
                    origin: Origin::Restored,
                });
                continue;
            }

            tracing::info!(accessory = %identity.name, "adding new accessory");
            let accessory = LogicalAccessory::from_identity(identity.clone());
            match self.repo.upsert(accessory).await {
                Ok(accessory) => reconciled.push(Reconciled {
                    accessory,
                    origin: Origin::Created,
                }),
                Err(err) => tracing::warn!(
                    accessory = %identity.name,
                    error = %err,
                    "failed to register accessory, skipping"
                ),
            }
        }

        reconciled
    }

    /// Load the cache, reconcile, and spawn one poller per accessory.
    ///
    /// # Errors
    ///
    /// Returns an error if the cached accessories cannot be loaded.
    pub async fn start(
        &self,
        configured: &[SensorIdentity],
        cancel: &CancellationToken,
    ) -> Result<PollerFleet, ThermohubError> {
        let cached = self.repo.load_all().await?;
        for accessory in &cached {
            tracing::info!(accessory = %accessory.display_name, "loading accessory from cache");
        }

        let mut fleet = PollerFleet::new(cancel);
        for Reconciled { accessory, .. } in self.reconcile(configured, &cached).await {
            let accessory_id = accessory.id;
            let name = accessory.display_name.clone();
            match DevicePoller::attach(accessory, self.variant, self.ctx.clone()).await {
                Ok(poller) => fleet.push(accessory_id, poller.spawn(fleet.token())),
                Err(err) => tracing::warn!(
                    accessory = %name,
                    error = %err,
                    "failed to attach accessory, not polling"
                ),
            }
        }

        tracing::info!(pollers = fleet.len(), "pollers started");
        Ok(fleet)
    }
}
