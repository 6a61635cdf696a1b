//! In-memory port implementations shared by the service tests.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use thermohub_domain::accessory::LogicalAccessory;
use thermohub_domain::address::MacAddress;
use thermohub_domain::channel::{ChannelKind, ChannelState, ServiceHandle, ServiceType};
use thermohub_domain::characteristic::Characteristic;
use thermohub_domain::error::ThermohubError;
use thermohub_domain::history::HistoryEntry;
use thermohub_domain::id::AccessoryId;
use thermohub_domain::reading::Reading;

use crate::ports::{AccessoryRepository, CharacteristicStore, HistorySink, ReadError, ReadingSource};

const STALL: Duration = Duration::from_secs(3600);

fn storage_error(message: &str) -> ThermohubError {
    ThermohubError::Storage(message.into())
}

pub enum Scripted {
    Reading(Reading),
    Fail,
    Hang,
}

/// Replays a fixed script of outcomes, one per read, then fails.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Scripted>>,
    reads: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ReadingSource for ScriptedSource {
    fn read(&self, address: MacAddress) -> impl Future<Output = Result<Reading, ReadError>> + Send {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        async move {
            match next {
                Some(Scripted::Reading(reading)) => Ok(reading),
                Some(Scripted::Hang) => {
                    tokio::time::sleep(STALL).await;
                    Err(ReadError::Unavailable(address))
                }
                Some(Scripted::Fail) | None => Err(ReadError::Unavailable(address)),
            }
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    services: Mutex<Vec<ServiceHandle>>,
    values: Mutex<HashMap<ServiceHandle, Vec<Characteristic>>>,
    pub failing: AtomicBool,
}

impl MemoryStore {
    pub fn service_types(&self, accessory_id: AccessoryId) -> Vec<ServiceType> {
        self.services
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.accessory_id == accessory_id)
            .map(|h| h.service_type)
            .collect()
    }

    pub fn get(
        &self,
        accessory_id: AccessoryId,
        service_type: ServiceType,
        name: &str,
    ) -> Option<Characteristic> {
        self.values
            .lock()
            .unwrap()
            .get(&ServiceHandle::new(accessory_id, service_type))
            .and_then(|values| values.iter().find(|c| c.name() == name).cloned())
    }

    pub fn channel(&self, accessory_id: AccessoryId, kind: ChannelKind) -> ChannelState {
        let values = self.values.lock().unwrap();
        let handle = ServiceHandle::new(accessory_id, kind.service_type());
        ChannelState::from_characteristics(kind, values.get(&handle).into_iter().flatten())
    }
}

impl CharacteristicStore for MemoryStore {
    fn service(
        &self,
        accessory_id: AccessoryId,
        service_type: ServiceType,
    ) -> impl Future<Output = Result<ServiceHandle, ThermohubError>> + Send {
        let handle = ServiceHandle::new(accessory_id, service_type);
        let mut services = self.services.lock().unwrap();
        if !services.contains(&handle) {
            services.push(handle);
        }
        async move { Ok(handle) }
    }

    fn update_characteristic(
        &self,
        handle: ServiceHandle,
        value: Characteristic,
    ) -> impl Future<Output = Result<(), ThermohubError>> + Send {
        let result = if self.failing.load(Ordering::SeqCst) {
            Err(storage_error("store unavailable"))
        } else {
            let mut values = self.values.lock().unwrap();
            let slot = values.entry(handle).or_default();
            slot.retain(|c| c.name() != value.name());
            slot.push(value);
            Ok(())
        };
        async move { result }
    }

    fn characteristics(
        &self,
        accessory_id: AccessoryId,
    ) -> impl Future<Output = Result<Vec<(ServiceType, Characteristic)>, ThermohubError>> + Send {
        let values = self.values.lock().unwrap();
        let result: Vec<_> = values
            .iter()
            .filter(|(h, _)| h.accessory_id == accessory_id)
            .flat_map(|(h, values)| values.iter().map(|c| (h.service_type, c.clone())))
            .collect();
        async move { Ok(result) }
    }
}

#[derive(Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<(AccessoryId, HistoryEntry)>>,
    pub failing: AtomicBool,
    pub stalling: AtomicBool,
}

impl MemoryHistory {
    pub fn entries(&self, accessory_id: AccessoryId) -> Vec<HistoryEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == accessory_id)
            .map(|(_, entry)| *entry)
            .collect()
    }
}

impl HistorySink for MemoryHistory {
    fn append(
        &self,
        accessory_id: AccessoryId,
        entry: HistoryEntry,
    ) -> impl Future<Output = Result<(), ThermohubError>> + Send {
        let stalling = self.stalling.load(Ordering::SeqCst);
        let result = if self.failing.load(Ordering::SeqCst) {
            Err(storage_error("history unavailable"))
        } else {
            if !stalling {
                self.entries.lock().unwrap().push((accessory_id, entry));
            }
            Ok(())
        };
        async move {
            if stalling {
                tokio::time::sleep(STALL).await;
            }
            result
        }
    }

    fn recent(
        &self,
        accessory_id: AccessoryId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, ThermohubError>> + Send {
        let mut result = self.entries(accessory_id);
        result.reverse();
        result.truncate(limit);
        async move { Ok(result) }
    }
}

#[derive(Default)]
pub struct MemoryRepo {
    store: Mutex<HashMap<AccessoryId, LogicalAccessory>>,
    upserts: AtomicUsize,
    rejected: Mutex<Option<MacAddress>>,
}

impl MemoryRepo {
    pub fn with(accessories: impl IntoIterator<Item = LogicalAccessory>) -> Self {
        let repo = Self::default();
        repo.store
            .lock()
            .unwrap()
            .extend(accessories.into_iter().map(|a| (a.id, a)));
        repo
    }

    pub fn reject(&self, address: MacAddress) {
        *self.rejected.lock().unwrap() = Some(address);
    }

    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> usize {
        self.store.lock().unwrap().len()
    }
}

impl AccessoryRepository for MemoryRepo {
    fn load_all(&self) -> impl Future<Output = Result<Vec<LogicalAccessory>, ThermohubError>> + Send {
        let result: Vec<_> = self.store.lock().unwrap().values().cloned().collect();
        async move { Ok(result) }
    }

    fn get_by_id(
        &self,
        id: AccessoryId,
    ) -> impl Future<Output = Result<Option<LogicalAccessory>, ThermohubError>> + Send {
        let result = self.store.lock().unwrap().get(&id).cloned();
        async move { Ok(result) }
    }

    fn upsert(
        &self,
        accessory: LogicalAccessory,
    ) -> impl Future<Output = Result<LogicalAccessory, ThermohubError>> + Send {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        let rejected = *self.rejected.lock().unwrap() == Some(accessory.context.address);
        let result = if rejected {
            Err(storage_error("registration rejected"))
        } else {
            self.store
                .lock()
                .unwrap()
                .insert(accessory.id, accessory.clone());
            Ok(accessory)
        };
        async move { result }
    }
}
