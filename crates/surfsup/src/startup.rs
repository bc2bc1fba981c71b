use crate::{
    db, health_handler, precipitation, range_stats, reports, routes, start_stats, stations, tobs,
    ClimateAccess, ClimateData, ClimateReports, ReportOptions,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate_db: Arc<dyn ClimateData>,
    pub reports: Arc<ClimateReports>,
}

impl AppState {
    pub fn new(climate_db: Arc<dyn ClimateData>, options: ReportOptions) -> Self {
        let reports = Arc::new(ClimateReports::new(climate_db.clone(), options));
        Self {
            climate_db,
            reports,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::start_stats,
        routes::climate::climate_routes::range_stats,
        routes::home::health::health_handler,
    ),
    components(
        schemas(
                db::TemperatureObservation,
                db::StartStats,
                db::RangeStats,
                reports::ErrorBody
            )
    ),
    tags(
        (name = "surfsup climate api", description = "a read-only RESTful api over Hawaii precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(
    database_path: &str,
    options: ReportOptions,
) -> Result<AppState, anyhow::Error> {
    let climate_db = Arc::new(
        ClimateAccess::new(database_path)
            .await
            .map_err(|e| anyhow!("error opening climate store: {}", e))?,
    );

    Ok(AppState::new(climate_db, options))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_handler))
        // API routes, static segments take priority over `{start}`
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(start_stats))
        .route("/api/v1.0/{start}/{end}", get(range_stats))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, {} code: {}, time: {}", path, response.status().as_str(), response_time);

    response
}
