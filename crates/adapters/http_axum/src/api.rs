//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod accessories;
#[allow(clippy::missing_errors_doc)]
pub mod history;

use std::str::FromStr;

use axum::Router;
use axum::routing::get;

use thermohub_app::ports::{AccessoryRepository, CharacteristicStore, HistorySink};
use thermohub_domain::accessory::LogicalAccessory;
use thermohub_domain::error::{NotFoundError, ThermohubError, ValidationError};
use thermohub_domain::id::AccessoryId;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, C, H>() -> Router<AppState<R, C, H>>
where
    R: AccessoryRepository + 'static,
    C: CharacteristicStore + 'static,
    H: HistorySink + 'static,
{
    Router::new()
        .route("/accessories", get(accessories::list::<R, C, H>))
        .route("/accessories/{id}", get(accessories::get::<R, C, H>))
        .route("/accessories/{id}/history", get(history::list::<R, C, H>))
}

/// Resolve a path id to a cached accessory.
async fn find_accessory<R: AccessoryRepository>(
    repo: &R,
    id: &str,
) -> Result<LogicalAccessory, ApiError> {
    let accessory_id = AccessoryId::from_str(id).map_err(|_| {
        ThermohubError::from(ValidationError::InvalidId {
            value: id.to_owned(),
        })
    })?;

    repo.get_by_id(accessory_id).await?.ok_or_else(|| {
        ApiError::from(ThermohubError::from(NotFoundError {
            entity: "Accessory",
            id: id.to_owned(),
        }))
    })
}
