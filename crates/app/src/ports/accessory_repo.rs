//! Accessory repository port: the host's cache of logical accessories.

use std::future::Future;

use thermohub_domain::accessory::LogicalAccessory;
use thermohub_domain::error::ThermohubError;
use thermohub_domain::id::AccessoryId;

/// Persistence for [`LogicalAccessory`] records.
pub trait AccessoryRepository: Send + Sync {
    /// Every accessory restored from the previous run.
    fn load_all(&self) -> impl Future<Output = Result<Vec<LogicalAccessory>, ThermohubError>> + Send;

    /// Get an accessory by its derived identifier.
    fn get_by_id(
        &self,
        id: AccessoryId,
    ) -> impl Future<Output = Result<Option<LogicalAccessory>, ThermohubError>> + Send;

    /// Register an accessory, replacing any record with the same id.
    fn upsert(
        &self,
        accessory: LogicalAccessory,
    ) -> impl Future<Output = Result<LogicalAccessory, ThermohubError>> + Send;
}

impl<T: AccessoryRepository> AccessoryRepository for std::sync::Arc<T> {
    fn load_all(&self) -> impl Future<Output = Result<Vec<LogicalAccessory>, ThermohubError>> + Send {
        (**self).load_all()
    }

    fn get_by_id(
        &self,
        id: AccessoryId,
    ) -> impl Future<Output = Result<Option<LogicalAccessory>, ThermohubError>> + Send {
        (**self).get_by_id(id)
    }

    fn upsert(
        &self,
        accessory: LogicalAccessory,
    ) -> impl Future<Output = Result<LogicalAccessory, ThermohubError>> + Send {
        (**self).upsert(accessory)
    }
}
