//! Characteristic store port: the host's typed view of each accessory.

use std::future::Future;

use thermohub_domain::channel::{ServiceHandle, ServiceType};
use thermohub_domain::characteristic::Characteristic;
use thermohub_domain::error::ThermohubError;
use thermohub_domain::id::AccessoryId;

/// Holds the latest value of every characteristic published on a service.
///
/// A service holds at most one value per characteristic kind; updating a
/// characteristic replaces the previous value.
pub trait CharacteristicStore: Send + Sync {
    /// Get or create the service of the given type on an accessory.
    fn service(
        &self,
        accessory_id: AccessoryId,
        service_type: ServiceType,
    ) -> impl Future<Output = Result<ServiceHandle, ThermohubError>> + Send;

    /// Publish a characteristic value on a service.
    fn update_characteristic(
        &self,
        handle: ServiceHandle,
        value: Characteristic,
    ) -> impl Future<Output = Result<(), ThermohubError>> + Send;

    /// Every characteristic currently published for an accessory.
    fn characteristics(
        &self,
        accessory_id: AccessoryId,
    ) -> impl Future<Output = Result<Vec<(ServiceType, Characteristic)>, ThermohubError>> + Send;
}

impl<T: CharacteristicStore> CharacteristicStore for std::sync::Arc<T> {
    fn service(
        &self,
        accessory_id: AccessoryId,
        service_type: ServiceType,
    ) -> impl Future<Output = Result<ServiceHandle, ThermohubError>> + Send {
        (**self).service(accessory_id, service_type)
    }

    fn update_characteristic(
        &self,
        handle: ServiceHandle,
        value: Characteristic,
    ) -> impl Future<Output = Result<(), ThermohubError>> + Send {
        (**self).update_characteristic(handle, value)
    }

    fn characteristics(
        &self,
        accessory_id: AccessoryId,
    ) -> impl Future<Output = Result<Vec<(ServiceType, Characteristic)>, ThermohubError>> + Send {
        (**self).characteristics(accessory_id)
    }
}
