use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use log::error;

use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Climate store answered a round-trip query"),
        (status = SERVICE_UNAVAILABLE, description = "Climate store is unreachable")
    ))]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.climate_db.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!("health check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
