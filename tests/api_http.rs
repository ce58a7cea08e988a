// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /report   (happy path + structural 422)
// - POST /classify

use http::{Request, StatusCode};
use serde_json::json;
use serde_json::Value as Json;
use shuttle_axum::axum::{
    body::{self, Body},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use partnership_pipeline::api::{self, AppState};
use partnership_pipeline::PipelineConfig;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

fn test_router() -> Router {
    api::router(AppState::new(PipelineConfig::default()))
}

async fn post_json(app: Router, uri: &str, payload: Json) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Json = serde_json::from_slice(&bytes).expect("json body");
    (status, v)
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = test_router().oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8"), "ok");
}

#[tokio::test]
async fn api_report_returns_all_views() {
    let payload = json!({
        "sponsorships": [
            {"Prospect ID": "S1", "Prospect (Account Name)": "Acme", "Owner": "Dana",
             "Expected Value ($)": 1000, "Probability (%)": 0.5}
        ],
        "public_investment": [
            {"Prospect ID": "P1", "Prospect (Account Name)": "City", "Owner": "Lee",
             "Expected Value ($)": 400, "Contracted": "x"}
        ],
        "contacts": [
            {"Prospect (Account Name)": "Acme", "Contact Date": "2025-02-03",
             "Prospect (Sponsorship/Public)": "Sponsorship"}
        ],
        "filter": {"owners": ["dana"]}
    });
    let (status, v) = post_json(test_router(), "/report", payload).await;
    assert_eq!(status, StatusCode::OK, "body: {v}");

    // Contract checks for UI consumers
    for key in [
        "snapshot",
        "grouped_summary",
        "overall_summary",
        "top_deals",
        "board",
        "recent_activity",
        "prospects",
    ] {
        assert!(v.get(key).is_some(), "missing '{key}'");
    }
    assert_eq!(v["overall_summary"].as_array().map(Vec::len), Some(5));
    assert_eq!(v["prospects"].as_array().map(Vec::len), Some(2));
    assert_eq!(v["prospects"][0]["stage_bucket"], json!("50–75%"));
    assert_eq!(v["prospects"][1]["stage_bucket"], json!("Contracted"));
    // filter: only Dana's deal feeds the views
    assert_eq!(v["snapshot"]["total_expected"], json!(1000.0));
    assert_eq!(v["recent_activity"][0]["partner_type"], json!("Sponsorship"));
}

#[tokio::test]
async fn api_report_missing_column_is_422() {
    let payload = json!({
        "sponsorships": [{"Prospect (Account Name)": "Acme"}],
        "contacts": []
    });
    let (status, v) = post_json(test_router(), "/report", payload).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["batch"], json!("prospects"));
    assert_eq!(v["column"], json!("Prospect ID"));
    assert!(v["error"].as_str().unwrap_or("").contains("Prospect ID"));
}

#[tokio::test]
async fn api_classify_reports_bucket_and_rule() {
    let payload = json!([
        {"dead": true, "probability_percent": 100},
        {"probability_percent": 60},
        {"prospect": true},
        {}
    ]);
    let (status, v) = post_json(test_router(), "/classify", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v[0], json!({"bucket": "Dead", "rule": "dead_flag"}));
    assert_eq!(v[1]["bucket"], json!("50–75%"));
    assert_eq!(v[2], json!({"bucket": "Lead", "rule": "prospect_flag"}));
    assert_eq!(v[3]["rule"], json!("default_lead"));
}
