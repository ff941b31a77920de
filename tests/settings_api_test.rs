mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn reads_before_any_write_return_defaults() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["low_stock_threshold"], "10");
    assert_eq!(body["currency_symbol"], "$");
}

#[tokio::test]
async fn updates_merge_over_defaults_and_keep_unknown_keys() {
    let app = TestApp::new().await;

    let (status, body) = app
        .put(
            "/api/v1/settings",
            json!({ "currency_symbol": "€", "theme": "dark" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Settings updated successfully");

    let (_, settings) = app.get("/api/v1/settings").await;
    assert_eq!(settings["currency_symbol"], "€");
    assert_eq!(settings["theme"], "dark");
    // Untouched recognized keys still come back with their defaults.
    assert_eq!(settings["low_stock_threshold"], "10");
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.put("/api/v1/settings", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("No settings"));
}

#[tokio::test]
async fn threshold_changes_flow_into_product_status() {
    let app = TestApp::new().await;
    let id = app.seed_product("Laptop", None, 8, 899.99).await;

    let (_, before) = app.get(&format!("/api/v1/products/{id}")).await;
    assert_eq!(before["status"], "low-stock");

    app.put("/api/v1/settings", json!({ "low_stock_threshold": "5" })).await;

    let (_, after) = app.get(&format!("/api/v1/products/{id}")).await;
    assert_eq!(after["status"], "in-stock");

    // A malformed stored value falls back to the default of 10.
    app.put("/api/v1/settings", json!({ "low_stock_threshold": "lots" })).await;
    let (_, fallback) = app.get(&format!("/api/v1/products/{id}")).await;
    assert_eq!(fallback["status"], "low-stock");
}
