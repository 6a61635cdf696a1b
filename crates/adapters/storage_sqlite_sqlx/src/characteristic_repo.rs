//! `SQLite` implementation of [`CharacteristicStore`].
//!
//! Each characteristic is stored as its JSON encoding, keyed by accessory,
//! service type and characteristic name, so an update replaces the previous
//! value of the same kind.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use thermohub_app::ports::CharacteristicStore;
use thermohub_domain::channel::{ServiceHandle, ServiceType};
use thermohub_domain::characteristic::Characteristic;
use thermohub_domain::error::ThermohubError;
use thermohub_domain::id::AccessoryId;
use thermohub_domain::time::now;

use crate::error::StorageError;

struct Wrapper((ServiceType, Characteristic));

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let service_type: String = row.try_get("service_type")?;
        let value: String = row.try_get("value")?;

        let service_type = ServiceType::from_str(&service_type)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let value: Characteristic =
            serde_json::from_str(&value).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self((service_type, value)))
    }
}

const INSERT_SERVICE: &str = r"
    INSERT INTO services (accessory_id, service_type) VALUES (?, ?)
    ON CONFLICT(accessory_id, service_type) DO NOTHING
";

const UPSERT_CHARACTERISTIC: &str = r"
    INSERT INTO characteristics (accessory_id, service_type, characteristic, value, updated_at)
    VALUES (?, ?, ?, ?, ?)
    ON CONFLICT(accessory_id, service_type, characteristic) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
";

const SELECT_BY_ACCESSORY: &str = r"
    SELECT service_type, value FROM characteristics
    WHERE accessory_id = ?
    ORDER BY service_type, characteristic
";

/// `SQLite`-backed characteristic store.
pub struct SqliteCharacteristicStore {
    pool: SqlitePool,
}

impl SqliteCharacteristicStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl CharacteristicStore for SqliteCharacteristicStore {
    async fn service(
        &self,
        accessory_id: AccessoryId,
        service_type: ServiceType,
    ) -> Result<ServiceHandle, ThermohubError> {
        sqlx::query(INSERT_SERVICE)
            .bind(accessory_id.to_string())
            .bind(service_type.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(ServiceHandle::new(accessory_id, service_type))
    }

    async fn update_characteristic(
        &self,
        handle: ServiceHandle,
        value: Characteristic,
    ) -> Result<(), ThermohubError> {
        let encoded = serde_json::to_string(&value).map_err(StorageError::from)?;

        sqlx::query(UPSERT_CHARACTERISTIC)
            .bind(handle.accessory_id.to_string())
            .bind(handle.service_type.as_str())
            .bind(value.name())
            .bind(encoded)
            .bind(now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn characteristics(
        &self,
        accessory_id: AccessoryId,
    ) -> Result<Vec<(ServiceType, Characteristic)>, ThermohubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ACCESSORY)
            .bind(accessory_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
