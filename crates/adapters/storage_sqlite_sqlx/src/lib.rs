//! # thermohub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `AccessoryRepository`, `CharacteristicStore` and
//!   `HistorySink` port traits defined in `thermohub-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `thermohub-app` (for port traits) and `thermohub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod accessory_repo;
pub mod characteristic_repo;
pub mod error;
pub mod history_repo;
pub mod pool;

pub use accessory_repo::SqliteAccessoryRepository;
pub use characteristic_repo::SqliteCharacteristicStore;
pub use history_repo::SqliteHistorySink;
pub use pool::{Config, Database};
