//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod accessory_repo;
pub mod characteristic_store;
pub mod history_sink;
pub mod reading_source;

pub use accessory_repo::AccessoryRepository;
pub use characteristic_store::CharacteristicStore;
pub use history_sink::HistorySink;
pub use reading_source::{ReadError, ReadingSource};
