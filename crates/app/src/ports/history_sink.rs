//! History sink port: append-only time series per accessory.

use std::future::Future;

use thermohub_domain::error::ThermohubError;
use thermohub_domain::history::HistoryEntry;
use thermohub_domain::id::AccessoryId;

/// Accepts one [`HistoryEntry`] per healthy poll.
///
/// Entries are never modified or removed by the application.
pub trait HistorySink: Send + Sync {
    fn append(
        &self,
        accessory_id: AccessoryId,
        entry: HistoryEntry,
    ) -> impl Future<Output = Result<(), ThermohubError>> + Send;

    /// The most recent entries for an accessory, newest first.
    fn recent(
        &self,
        accessory_id: AccessoryId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, ThermohubError>> + Send;
}

impl<T: HistorySink> HistorySink for std::sync::Arc<T> {
    fn append(
        &self,
        accessory_id: AccessoryId,
        entry: HistoryEntry,
    ) -> impl Future<Output = Result<(), ThermohubError>> + Send {
        (**self).append(accessory_id, entry)
    }

    fn recent(
        &self,
        accessory_id: AccessoryId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, ThermohubError>> + Send {
        (**self).recent(accessory_id, limit)
    }
}
