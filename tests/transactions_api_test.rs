mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn recorded_movements_adjust_the_product_quantity() {
    let app = TestApp::new().await;
    let id = app.seed_product("Laptop", None, 10, 899.99).await;

    let (status, body) = app
        .post(
            "/api/v1/transactions",
            json!({ "product_id": id, "transaction_type": "Stock In", "quantity": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Transaction recorded successfully");

    let (status, _) = app
        .post(
            "/api/v1/transactions",
            json!({ "product_id": id, "transaction_type": "Stock Out", "quantity": 3, "notes": "damaged in transit" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, product) = app.get(&format!("/api/v1/products/{id}")).await;
    assert_eq!(product["quantity"], 12);
}

#[tokio::test]
async fn overdraw_is_rejected_and_leaves_quantity_untouched() {
    let app = TestApp::new().await;
    let id = app.seed_product("Laptop", None, 3, 899.99).await;

    let (status, body) = app
        .post(
            "/api/v1/transactions",
            json!({ "product_id": id, "transaction_type": "Stock Out", "quantity": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("only 3 in stock"));

    let (_, product) = app.get(&format!("/api/v1/products/{id}")).await;
    assert_eq!(product["quantity"], 3);

    // The rejected movement must not leave a ledger row behind.
    let (_, ledger) = app.get("/api/v1/transactions").await;
    assert_eq!(ledger.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn draining_stock_to_exactly_zero_is_allowed() {
    let app = TestApp::new().await;
    let id = app.seed_product("Laptop", None, 3, 899.99).await;

    let (status, _) = app
        .post(
            "/api/v1/transactions",
            json!({ "product_id": id, "transaction_type": "Stock Out", "quantity": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, product) = app.get(&format!("/api/v1/products/{id}")).await;
    assert_eq!(product["quantity"], 0);
    assert_eq!(product["status"], "out-of-stock");
}

#[tokio::test]
async fn malformed_movements_are_rejected() {
    let app = TestApp::new().await;
    let id = app.seed_product("Laptop", None, 3, 899.99).await;

    let (status, body) = app
        .post(
            "/api/v1/transactions",
            json!({ "product_id": id, "transaction_type": "Stock Sideways", "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid transaction type"));

    let (status, _) = app
        .post(
            "/api/v1/transactions",
            json!({ "product_id": id, "transaction_type": "Stock In", "quantity": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/v1/transactions",
            json!({ "product_id": 999, "transaction_type": "Stock In", "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_newest_first_and_honours_the_limit() {
    let app = TestApp::new().await;
    let id = app.seed_product("Laptop", None, 10, 899.99).await;
    app.post(
        "/api/v1/transactions",
        json!({ "product_id": id, "transaction_type": "Stock In", "quantity": 2 }),
    )
    .await;
    app.post(
        "/api/v1/transactions",
        json!({ "product_id": id, "transaction_type": "Stock Out", "quantity": 1 }),
    )
    .await;

    let (_, full) = app.get("/api/v1/transactions").await;
    let entries = full.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["transaction_type"], "Stock Out");
    assert_eq!(entries[2]["notes"], "New product added");

    let (_, limited) = app.get("/api/v1/transactions?limit=2").await;
    let entries = limited.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["transaction_type"], "Stock Out");
}

#[tokio::test]
async fn entries_for_deleted_products_resolve_to_a_null_name() {
    let app = TestApp::new().await;
    let id = app.seed_product("Laptop", None, 4, 899.99).await;
    app.delete(&format!("/api/v1/products/{id}")).await;

    let (_, ledger) = app.get("/api/v1/transactions").await;
    let entries = ledger.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    for entry in entries {
        assert!(entry["product_name"].is_null());
        assert_eq!(entry["product_id"].as_i64().unwrap(), id);
    }
}
