//! Integration tests for the HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use zipgeo::{SnapshotSource, ZipGeoService, ZipGeoServiceBuilder};
use zipgeo_service::{router, AppState, TracingObserver};

/// Write a snapshot file holding `entries` as `set` commands.
fn create_test_snapshot(dir: &Path, entries: &[(&str, &str)]) -> PathBuf {
    let mut data = Vec::new();
    for (key, value) in entries {
        data.extend_from_slice(
            format!(
                "*3\r\n$3\r\nset\r\n${}\r\n{}\r\n${}\r\n{}\r\n",
                key.len(),
                key,
                value.len(),
                value
            )
            .as_bytes(),
        );
    }
    let path = dir.join("zipgeo.db");
    std::fs::write(&path, data).unwrap();
    path
}

fn server_for(service: ZipGeoService<SnapshotSource>) -> TestServer {
    let state = Arc::new(AppState::new(service));
    TestServer::new(router(state)).unwrap()
}

/// Create a test server over a small snapshot.
fn create_test_server(temp_dir: &TempDir) -> TestServer {
    let path = create_test_snapshot(
        temp_dir.path(),
        &[
            ("zip:30019", "33.9526,-83.7479"),
            ("zip:00501", "40.8154,-73.0451"),
            ("zip:99999", "not-a-number,5.0"),
            ("zip:99998", "33.9"),
        ],
    );
    let service = ZipGeoServiceBuilder::new(path)
        .observer(Arc::new(TracingObserver))
        .build()
        .unwrap();
    server_for(service)
}

#[tokio::test]
async fn test_get_zipgeo_success() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .get("/zipgeo")
        .add_query_param("zipcode", "30019")
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["zipcode"], 30019);
    assert_eq!(json["latitude"], 33.9526);
    assert_eq!(json["longitude"], -83.7479);
    assert_eq!(json["version"], zipgeo::version::service_version());
}

#[tokio::test]
async fn test_post_zipgeo_success() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/zipgeo")
        .json(&json!({ "zipcode": "30019" }))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["zipcode"], 30019);
    assert_eq!(json["latitude"], 33.9526);
}

#[tokio::test]
async fn test_leading_zeros() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .get("/zipgeo")
        .add_query_param("zipcode", "00501")
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["zipcode"], 501);
    assert_eq!(json["latitude"], 40.8154);

    // Without the leading zeros the key differs
    let response = server
        .get("/zipgeo")
        .add_query_param("zipcode", "501")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_zipcode() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    for zipcode in ["abc", "", "300 19"] {
        let response = server
            .get("/zipgeo")
            .add_query_param("zipcode", zipcode)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let json: Value = response.json();
        assert_eq!(json["kind"], "invalid_input");
    }
}

#[tokio::test]
async fn test_unknown_zipcode() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .get("/zipgeo")
        .add_query_param("zipcode", "12345")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json: Value = response.json();
    assert_eq!(json["kind"], "not_found");
    assert!(json["error"].as_str().unwrap().contains("12345"));
}

#[tokio::test]
async fn test_malformed_record() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    for zipcode in ["99999", "99998"] {
        let response = server
            .post("/zipgeo")
            .json(&json!({ "zipcode": zipcode }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = response.json();
        assert_eq!(json["kind"], "malformed_record");
    }
}

#[tokio::test]
async fn test_dataset_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let service = ZipGeoServiceBuilder::new(temp_dir.path().join("missing.db"))
        .build()
        .unwrap();
    let server = server_for(service);

    let response = server
        .get("/zipgeo")
        .add_query_param("zipcode", "30019")
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = response.json();
    assert_eq!(json["kind"], "dataset_unavailable");
}

#[tokio::test]
async fn test_preloaded_service() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_test_snapshot(temp_dir.path(), &[("zip:30019", "33.9526,-83.7479")]);
    let service = ZipGeoServiceBuilder::new(&path).preload(true).build().unwrap();

    // The snapshot is no longer needed once loaded
    std::fs::remove_file(&path).unwrap();
    let server = server_for(service);

    let response = server
        .get("/zipgeo")
        .add_query_param("zipcode", "30019")
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_missing_parameters() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    // No query parameter
    let response = server.get("/zipgeo").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Body without zipcode
    let response = server.post("/zipgeo").json(&json!({ "zip": "30019" })).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_repeated_lookups_identical() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let first: Value = server
        .get("/zipgeo")
        .add_query_param("zipcode", "30019")
        .await
        .json();
    let second: Value = server
        .get("/zipgeo")
        .add_query_param("zipcode", "30019")
        .await
        .json();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_health_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], zipgeo::version::service_version());
}

#[tokio::test]
async fn test_openapi_document() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["paths"]["/zipgeo"]["get"].is_object());
    assert!(json["paths"]["/zipgeo"]["post"].is_object());
}
