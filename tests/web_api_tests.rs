//! Integration tests for the explorer's HTTP surface.
//!
//! Each test loads a CSV fixture from a temporary directory, exactly as the
//! binary does at startup, and drives the router with `oneshot`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

use element_explorer::app::create_router;
use element_explorer::config::{Config, FacetConfig};
use element_explorer::data::DataLoadError;
use element_explorer::state::AppState;
use element_explorer::ui::{NO_RESULTS, NO_SELECTION};

const ELEMENTS_CSV: &str = "\
Element No,Element Name,Symbol,Category,Action,Definition
1,Hydrogen,H,X,Adopt,Lightest element
2,Helium,He,Y,Avoid,Part of the Solar System's noble gases
";

fn config_for(path: PathBuf) -> Config {
    Config {
        data_path: path,
        sheet: None,
        addr: "127.0.0.1:0".parse().unwrap(),
        verbose: false,
        facets: FacetConfig::default(),
    }
}

/// Creates a router over the two-element fixture.
fn create_test_app() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("elements.csv");
    fs::write(&path, ELEMENTS_CSV).expect("Failed to write fixture");

    let state = AppState::load(&config_for(path)).expect("Failed to load fixture");
    (create_router(state), temp_dir)
}

/// Helper to make a GET request and return status, content type and body text.
async fn get(app: &axum::Router, uri: &str) -> (StatusCode, String, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_str(&body).unwrap_or(Value::Null))
}

// ============================================================================
// Startup
// ============================================================================

#[test]
fn test_missing_file_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();
    let result = AppState::load(&config_for(temp_dir.path().join("final_element_sheet.xlsx")));
    assert!(matches!(result, Err(DataLoadError::NotFound(_))));
}

// ============================================================================
// Page
// ============================================================================

#[tokio::test]
async fn test_index_shows_every_element() {
    let (app, _temp_dir) = create_test_app();

    let (status, content_type, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains("Showing 2 of 2 elements"));
    assert!(body.contains("1 — Hydrogen (H)"));
    assert!(body.contains("2 — Helium (He)"));
}

#[tokio::test]
async fn test_category_filter() {
    let (app, _temp_dir) = create_test_app();

    let (_, _, body) = get(&app, "/?Category=X").await;

    assert!(body.contains("Showing 1 of 2 elements"));
    assert!(body.contains("Hydrogen"));
    assert!(!body.contains("2 — Helium"));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let (app, _temp_dir) = create_test_app();

    let (_, _, body) = get(&app, "/?q=HELI").await;
    assert!(body.contains("Showing 1 of 2 elements"));
    assert!(body.contains("2 — Helium (He)"));

    let (_, _, body) = get(&app, "/?q=solar").await;
    assert!(body.contains("Showing 1 of 2 elements"));
}

#[tokio::test]
async fn test_combined_filters_render_no_results() {
    let (app, _temp_dir) = create_test_app();

    let (status, _, body) = get(&app, "/?Category=X&q=heli").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Showing 0 of 2 elements"));
    assert!(body.contains(NO_RESULTS));
}

#[tokio::test]
async fn test_submitted_form_with_no_categories_checked() {
    let (app, _temp_dir) = create_test_app();

    let (_, _, body) = get(&app, "/?filtered=1&Action=Adopt&Action=Avoid").await;

    assert!(body.contains("Showing 0 of 2 elements"));
}

#[tokio::test]
async fn test_table_view_detail_selection() {
    let (app, _temp_dir) = create_test_app();

    let (_, _, body) = get(&app, "/?view=table&row=1").await;
    assert!(body.contains("Table (desktop view)"));
    assert!(body.contains("<h3>Helium (He)</h3>"));

    let (status, _, body) = get(&app, "/?view=table&row=99").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(NO_SELECTION));
}

#[tokio::test]
async fn test_range_filter() {
    let (app, _temp_dir) = create_test_app();

    let (_, _, body) = get(&app, "/?min=2&max=2").await;

    assert!(body.contains("Showing 1 of 2 elements"));
    assert!(body.contains("2 — Helium (He)"));
}

// ============================================================================
// Download
// ============================================================================

#[tokio::test]
async fn test_download_filtered_csv() {
    let (app, _temp_dir) = create_test_app();

    let (status, content_type, body) = get(&app, "/download.csv?Category=Y").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/csv"));
    let mut lines = body.lines();
    assert_eq!(
        lines.next(),
        Some("Element No,Element Name,Symbol,Category,Action,Definition")
    );
    assert!(lines.next().unwrap().starts_with("2,Helium,He,Y,Avoid,"));
    assert_eq!(lines.next(), None);
}

// ============================================================================
// JSON API
// ============================================================================

#[tokio::test]
async fn test_list_elements_json() {
    let (app, _temp_dir) = create_test_app();

    let (status, json) = get_json(&app, "/api/elements?q=hydro").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);
    assert_eq!(json["shown"], 1);
    assert_eq!(json["columns"][1], "Element Name");
    assert_eq!(json["rows"][0]["id"], 0);
    assert_eq!(json["rows"][0]["cells"][0], 1);
}

#[tokio::test]
async fn test_get_element_by_id() {
    let (app, _temp_dir) = create_test_app();

    let (status, json) = get_json(&app, "/api/elements/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cells"][1], "Helium");

    let (status, json) = get_json(&app, "/api/elements/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_health_check() {
    let (app, _temp_dir) = create_test_app();

    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["rows"], 2);
    assert!(json["version"].is_string());
}
