use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    parse_date, reports, AppState, Precipitation, RangeStats, StartStats, TemperatureObservation,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation keyed by date for the last year of data", content_type = "application/json", body = std::collections::BTreeMap<String, Option<f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the climate store", body = reports::ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Precipitation>, reports::Error> {
    state.reports.get_precipitation().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station id in the dataset", content_type = "application/json", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the climate store", body = reports::ErrorBody)
    ))]
pub async fn stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, reports::Error> {
    state.reports.get_stations().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations of the most active station for its last year of data", content_type = "application/json", body = Vec<TemperatureObservation>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the climate store", body = reports::ErrorBody)
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureObservation>>, reports::Error> {
    state.reports.get_tobs().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "First date included, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min/avg/max temperature from the start date onwards", content_type = "application/json", body = Vec<StartStats>),
        (status = BAD_REQUEST, description = "Start is not a YYYY-MM-DD date", body = reports::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the climate store", body = reports::ErrorBody)
    ))]
pub async fn start_stats(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<StartStats>>, reports::Error> {
    let start = parse_date(&start)?;
    state.reports.get_stats_from(start).await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "First date included, YYYY-MM-DD"),
         ("end" = String, Path, description = "Last date included, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "TMIN/TAVG/TMAX between the two dates, inclusive", content_type = "application/json", body = Vec<RangeStats>),
        (status = BAD_REQUEST, description = "Start or end is not a YYYY-MM-DD date", body = reports::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the climate store", body = reports::ErrorBody)
    ))]
pub async fn range_stats(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<RangeStats>>, reports::Error> {
    let start = parse_date(&start)?;
    let end = parse_date(&end)?;
    state.reports.get_stats_range(start, end).await.map(Json)
}
