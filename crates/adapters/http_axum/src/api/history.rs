//! JSON REST handler for accessory history.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use thermohub_app::ports::{AccessoryRepository, CharacteristicStore, HistorySink};
use thermohub_domain::history::HistoryEntry;

use crate::error::ApiError;
use crate::state::AppState;

/// Default number of entries returned.
const DEFAULT_LIMIT: usize = 100;

/// Upper bound on the number of entries returned.
const MAX_LIMIT: usize = 1000;

/// Query parameters for the history endpoint.
#[derive(Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of entries. Defaults to 100, capped at 1000.
    pub limit: Option<usize>,
}

/// Possible responses from the history list endpoint.
pub enum ListResponse {
    /// 200 OK with the most recent entries, newest first.
    Ok(Json<Vec<HistoryEntry>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/accessories/{id}/history?limit=`
pub async fn list<R, C, H>(
    State(state): State<AppState<R, C, H>>,
    Path(id): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<ListResponse, ApiError>
where
    R: AccessoryRepository + 'static,
    C: CharacteristicStore + 'static,
    H: HistorySink + 'static,
{
    let accessory = super::find_accessory(state.accessories.as_ref(), &id).await?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let entries = state.history.recent(accessory.id, limit).await?;
    Ok(ListResponse::Ok(Json(entries)))
}
