//! `SQLite` implementation of [`AccessoryRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use thermohub_app::ports::AccessoryRepository;
use thermohub_domain::accessory::LogicalAccessory;
use thermohub_domain::address::MacAddress;
use thermohub_domain::error::ThermohubError;
use thermohub_domain::id::AccessoryId;
use thermohub_domain::sensor::SensorIdentity;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`LogicalAccessory`].
struct Wrapper(LogicalAccessory);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let display_name: String = row.try_get("display_name")?;
        let name: String = row.try_get("name")?;
        let address: String = row.try_get("address")?;
        let created_at: String = row.try_get("created_at")?;

        let id = AccessoryId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let address =
            MacAddress::from_str(&address).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(LogicalAccessory {
            id,
            display_name,
            context: SensorIdentity { name, address },
            created_at,
        }))
    }
}

const UPSERT: &str = r"
    INSERT INTO accessories (id, display_name, name, address, created_at)
    VALUES (?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        display_name = excluded.display_name,
        name = excluded.name,
        address = excluded.address
";
const SELECT_BY_ID: &str = "SELECT * FROM accessories WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM accessories ORDER BY created_at, id";

/// `SQLite`-backed accessory cache.
pub struct SqliteAccessoryRepository {
    pool: SqlitePool,
}

impl SqliteAccessoryRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AccessoryRepository for SqliteAccessoryRepository {
    fn load_all(&self) -> impl Future<Output = Result<Vec<LogicalAccessory>, ThermohubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn get_by_id(
        &self,
        id: AccessoryId,
    ) -> impl Future<Output = Result<Option<LogicalAccessory>, ThermohubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(row.map(|w| w.0))
        }
    }

    fn upsert(
        &self,
        accessory: LogicalAccessory,
    ) -> impl Future<Output = Result<LogicalAccessory, ThermohubError>> + Send {
        let pool = self.pool.clone();
        async move {
            accessory.validate()?;
            sqlx::query(UPSERT)
                .bind(accessory.id.to_string())
                .bind(&accessory.display_name)
                .bind(&accessory.context.name)
                .bind(accessory.context.address.to_string())
                .bind(accessory.created_at.to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(accessory)
        }
    }
}
