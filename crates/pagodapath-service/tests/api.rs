//! In-memory API tests for the pathfinding service.

use axum_test::TestServer;
use serde_json::{json, Value};

use pagodapath_lib::{GraphOptions, PointRecord};
use pagodapath_service::{app, AppState};

fn record(name: &str, lat: f64, lng: f64) -> PointRecord {
    PointRecord {
        name: name.to_string(),
        lat,
        lng,
    }
}

/// Equatorial chain with consecutive points ~8.9 km apart plus a point
/// ~1.1 km off the first vertex.
fn chain_records() -> Vec<PointRecord> {
    vec![
        record("A", 0.0, 0.0),
        record("B", 0.0, 0.08),
        record("C", 0.0, 0.16),
        record("Offside", 0.01, 0.0),
        record("Remote", 5.0, 5.0),
    ]
}

fn server() -> TestServer {
    let state = AppState::from_records(&chain_records(), GraphOptions::default())
        .expect("valid records");
    TestServer::new(app(state)).expect("server starts")
}

#[tokio::test]
async fn points_endpoint_lists_the_dataset() {
    let server = server();

    let response = server.get("/api/v1/points").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let names: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .map(|point| point["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["A", "B", "C", "Offside", "Remote"]);
}

#[tokio::test]
async fn path_endpoint_returns_route_and_nearby() {
    let server = server();

    let response = server
        .post("/api/v1/path")
        .json(&json!({ "from": "A", "to": "C", "nearby_radius_km": 2.0 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["path"], json!(["A", "B", "C"]));
    assert_eq!(body["path_length"], json!(3));
    assert!(body["distance_km"].as_f64().expect("distance") > 17.0);

    let nearby = body["nearby_points"].as_array().expect("nearby array");
    assert_eq!(nearby.len(), 1);
    assert_eq!(nearby[0]["name"], json!("Offside"));
}

#[tokio::test]
async fn unknown_point_is_a_problem_response() {
    let server = server();

    let response = server
        .post("/api/v1/path")
        .json(&json!({ "from": "Nope", "to": "C" }))
        .await;
    response.assert_status_not_found();

    let body: Value = response.json();
    assert_eq!(body["type"], json!("/problems/unknown-point"));
    assert_eq!(body["status"], json!(404));
}

#[tokio::test]
async fn disconnected_pair_is_route_not_found() {
    let server = server();

    let response = server
        .post("/api/v1/path")
        .json(&json!({ "from": "A", "to": "Remote" }))
        .await;
    response.assert_status_not_found();

    let body: Value = response.json();
    assert_eq!(body["type"], json!("/problems/route-not-found"));
}

#[tokio::test]
async fn empty_from_is_rejected() {
    let server = server();

    let response = server
        .post("/api/v1/path")
        .json(&json!({ "from": "", "to": "C" }))
        .await;
    response.assert_status_bad_request();

    let body: Value = response.json();
    assert_eq!(body["type"], json!("/problems/invalid-request"));
}

#[tokio::test]
async fn negative_radius_is_rejected() {
    let server = server();

    let response = server
        .post("/api/v1/path")
        .json(&json!({ "from": "A", "to": "C", "nearby_radius_km": -1.0 }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn health_probes_respond() {
    let server = server();

    server.get("/health/live").await.assert_status_ok();
    server.get("/health/ready").await.assert_status_ok();
}

#[tokio::test]
async fn readiness_fails_with_no_points() {
    let state = AppState::from_records(&[], GraphOptions::default()).expect("empty is valid");
    let server = TestServer::new(app(state)).expect("server starts");

    let response = server.get("/health/ready").await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}
