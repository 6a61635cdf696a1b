//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod fleet;
pub mod poller;
pub mod registry;

pub use fleet::PollerFleet;
pub use poller::{CycleReport, DevicePoller, PollerContext, PollerSettings};
pub use registry::{AccessoryRegistry, Origin, Reconciled};
