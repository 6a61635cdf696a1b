//! # thermohub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ReadingSource`: obtain one reading from a sensor address
//!   - `AccessoryRepository`: the host's cache of logical accessories
//!   - `CharacteristicStore`: typed services and characteristics per accessory
//!   - `HistorySink`: append-only time series per accessory
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AccessoryRegistry`: reconcile configured sensors with the cache and
//!     start one poller per accessory
//!   - `DevicePoller`: the per-device read, classify, publish loop
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `thermohub-domain` only (plus `tokio` for timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
