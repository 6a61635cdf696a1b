//! # thermohub-domain
//!
//! Pure domain model for the thermohub sensor bridge.
//!
//! ## Responsibilities
//! - Foundational types: hardware addresses, derived accessory identifiers,
//!   error conventions, timestamps
//! - Define **Sensor identities** (configured `{name, address}` pairs) and the
//!   **Sensor variants** that describe which channels a product exposes
//! - Define **Logical accessories** (the persisted, host-visible device record)
//! - Define **Channels** and the typed **Characteristics** published on them
//! - Define **Readings** and **History entries**
//! - Classify readings into fault / low-battery / normal status
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod accessory;
pub mod address;
pub mod channel;
pub mod characteristic;
pub mod history;
pub mod reading;
pub mod sensor;
pub mod status;
