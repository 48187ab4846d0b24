//! Route-level tests: parameter extraction, status mapping and envelope
//! serialization through the axum router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use qualinfo::{app, Aggregator, AppConfig};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn test_router(server: &MockServer) -> axum::Router {
    let mut config = AppConfig::default();
    config.govdata.service_key = "test-key".to_string();
    config.sparql.endpoint = server.url("/sparql");
    config.govdata.exam_schedule_url = server.url("/schedule");
    config.govdata.exam_area_url = server.url("/exam-area");
    config.govdata.mid_land_url = server.url("/mid-land");
    config.govdata.mid_ta_url = server.url("/mid-ta");
    config.govdata.exam_fee_url = server.url("/fee");
    config.govdata.exam_site_url = server.url("/site");

    app::router(Arc::new(Aggregator::new(config).unwrap()))
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

#[tokio::test]
async fn test_root_is_alive() {
    let server = MockServer::start();
    let (status, body) = get(test_router(&server), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "backend alive");
}

#[tokio::test]
async fn test_unknown_weather_region_is_400_with_valid_values() {
    let server = MockServer::start();
    let (status, body) = get(test_router(&server), "/weather/mid?region=nowhere").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("nowhere"));
    assert!(detail.contains("수도권"));
}

#[tokio::test]
async fn test_unknown_schedule_category_is_400() {
    let server = MockServer::start();
    let (status, body) = get(
        test_router(&server),
        "/licenses/schedule?name=x&year=2025&qualgb_name=unknown",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("unknown"));
}

#[tokio::test]
async fn test_empty_search_keyword_is_400() {
    let server = MockServer::start();
    let (status, _) = get(test_router(&server), "/licenses/search?q=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_exam_centers_paging_bounds_are_400() {
    let server = MockServer::start();
    let (status, _) = get(
        test_router(&server),
        "/exam-centers?brch_cd=01&per_page=500",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upstream_failure_maps_to_502() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/sparql");
        then.status(500).body("boom");
    });

    let (status, body) = get(test_router(&server), "/terminals/regions").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_terminal_regions_envelope() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/sparql");
        then.status(200).json_body(serde_json::json!({
            "head": { "vars": ["regionName"] },
            "results": { "bindings": [
                { "regionName": { "type": "literal", "value": "경기도" } }
            ] }
        }));
    });

    let (status, body) = get(test_router(&server), "/terminals/regions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["regions"][0], "경기도");
}

#[tokio::test]
async fn test_schedule_envelope_uses_upstream_field_names() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/schedule");
        then.status(200).json_body(serde_json::json!({
            "response": { "body": { "items": { "item": [{
                "implYy": "2025",
                "implSeq": "1",
                "qualgbCd": "T",
                "qualgbNm": "국가기술자격",
                "description": "plan",
                "docRegStartDt": "20250401"
            }] } } }
        }));
    });

    let (status, body) = get(
        test_router(&server),
        "/licenses/schedule?name=plan&year=2025",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_from_api"], 1);
    assert_eq!(body["count"], 1);
    assert_eq!(body["filtered"], true);

    let row = &body["results"][0];
    assert_eq!(row["qualgbCd"], "T");
    assert_eq!(row["docRegStartDt"], "2025-04-01");
    assert_eq!(row["docRegEndDt"], "");
    assert_eq!(row["year"], "2025");
}
