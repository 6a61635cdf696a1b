//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use thermohub_app::ports::{AccessoryRepository, CharacteristicStore, HistorySink};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves the API routes under `/api`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<R, C, H>(state: AppState<R, C, H>) -> Router
where
    R: AccessoryRepository + 'static,
    C: CharacteristicStore + 'static,
    H: HistorySink + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
