//! The set of running pollers.

use thermohub_domain::id::AccessoryId;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handles of every spawned [`DevicePoller`](super::poller::DevicePoller).
///
/// Pollers observe a child of the token the fleet was created with, so
/// cancelling the parent stops them too.
pub struct PollerFleet {
    cancel: CancellationToken,
    tasks: Vec<(AccessoryId, JoinHandle<()>)>,
}

impl PollerFleet {
    #[must_use]
    pub fn new(parent: &CancellationToken) -> Self {
        Self {
            cancel: parent.child_token(),
            tasks: Vec::new(),
        }
    }

    /// Token a poller must observe to stop with the fleet.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn push(&mut self, accessory_id: AccessoryId, task: JoinHandle<()>) {
        self.tasks.push((accessory_id, task));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn accessory_ids(&self) -> impl Iterator<Item = AccessoryId> + '_ {
        self.tasks.iter().map(|(id, _)| *id)
    }

    /// Stop every poller and wait for in-flight cycles to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for (accessory_id, task) in self.tasks {
            if let Err(err) = task.await {
                tracing::warn!(accessory = %accessory_id, error = %err, "poller task ended abnormally");
            }
        }
        tracing::info!("all pollers stopped");
    }
}
