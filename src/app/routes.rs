//! Thin HTTP surface: routes, query-parameter structs and the error-status
//! mapping. All decision logic lives in the core handlers; these functions
//! only extract parameters and serialize the results.

use crate::core::Aggregator;
use crate::domain::model::{
    CodedItemsResponse, ExamCentersResponse, LicenseSearchResponse, ScheduleResponse,
    TerminalListResponse, TerminalLocalitiesResponse, TerminalRegionsResponse, WeatherResponse,
};
use crate::utils::error::ApiError;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

type HttpError = (StatusCode, Json<ErrorBody>);

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

fn http_error(err: ApiError) -> HttpError {
    let status = match &err {
        ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        ApiError::Upstream(_)
        | ApiError::UpstreamStatus { .. }
        | ApiError::Xml(_)
        | ApiError::Serialization(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!("request failed: {}", err);
    }

    (
        status,
        Json(ErrorBody {
            detail: err.to_string(),
        }),
    )
}

/// The frontend is served from a different origin, so CORS stays wide open.
pub fn router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/licenses/search", get(search_licenses))
        .route("/licenses/schedule", get(license_schedule))
        .route("/licenses/fee", get(license_fee))
        .route("/licenses/sites", get(license_sites))
        .route("/exam-centers", get(exam_centers))
        .route("/weather/mid", get(mid_weather))
        .route("/terminals/regions", get(terminal_regions))
        .route("/terminals/localities", get(terminal_localities))
        .route("/terminals/by-region", get(terminals_by_region))
        .layer(CorsLayer::permissive())
        .with_state(aggregator)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "backend alive" }))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
}

async fn search_licenses(
    State(agg): State<Arc<Aggregator>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<LicenseSearchResponse>, HttpError> {
    agg.search_licenses(&params.q)
        .await
        .map(Json)
        .map_err(http_error)
}

#[derive(Debug, Deserialize)]
struct ScheduleParams {
    name: String,
    year: i32,
    qualgb_name: Option<String>,
}

async fn license_schedule(
    State(agg): State<Arc<Aggregator>>,
    Query(params): Query<ScheduleParams>,
) -> Result<Json<ScheduleResponse>, HttpError> {
    agg.exam_schedule(&params.name, params.year, params.qualgb_name.as_deref())
        .await
        .map(Json)
        .map_err(http_error)
}

#[derive(Debug, Deserialize)]
struct NameParams {
    name: String,
}

async fn license_fee(
    State(agg): State<Arc<Aggregator>>,
    Query(params): Query<NameParams>,
) -> Result<Json<CodedItemsResponse>, HttpError> {
    agg.license_fee(&params.name)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn license_sites(
    State(agg): State<Arc<Aggregator>>,
    Query(params): Query<NameParams>,
) -> Result<Json<CodedItemsResponse>, HttpError> {
    agg.license_sites(&params.name)
        .await
        .map(Json)
        .map_err(http_error)
}

#[derive(Debug, Deserialize)]
struct ExamCenterParams {
    brch_cd: String,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    50
}

async fn exam_centers(
    State(agg): State<Arc<Aggregator>>,
    Query(params): Query<ExamCenterParams>,
) -> Result<Json<ExamCentersResponse>, HttpError> {
    agg.exam_centers(&params.brch_cd, params.page, params.per_page)
        .await
        .map(Json)
        .map_err(http_error)
}

#[derive(Debug, Deserialize)]
struct WeatherParams {
    region: String,
    tm_fc: Option<String>,
}

async fn mid_weather(
    State(agg): State<Arc<Aggregator>>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherResponse>, HttpError> {
    agg.mid_weather(&params.region, params.tm_fc)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn terminal_regions(
    State(agg): State<Arc<Aggregator>>,
) -> Result<Json<TerminalRegionsResponse>, HttpError> {
    agg.terminal_regions().await.map(Json).map_err(http_error)
}

#[derive(Debug, Deserialize)]
struct LocalitiesParams {
    sido: String,
}

async fn terminal_localities(
    State(agg): State<Arc<Aggregator>>,
    Query(params): Query<LocalitiesParams>,
) -> Result<Json<TerminalLocalitiesResponse>, HttpError> {
    agg.terminal_localities(&params.sido)
        .await
        .map(Json)
        .map_err(http_error)
}

#[derive(Debug, Deserialize)]
struct ByRegionParams {
    sido: String,
    locality: Option<String>,
}

async fn terminals_by_region(
    State(agg): State<Arc<Aggregator>>,
    Query(params): Query<ByRegionParams>,
) -> Result<Json<TerminalListResponse>, HttpError> {
    agg.terminals_by_region(&params.sido, params.locality.as_deref())
        .await
        .map(Json)
        .map_err(http_error)
}
