mod common;

use axum::http::{Method, StatusCode};
use godown_api::auth::DEFAULT_ADMIN_PASSCODE;
use serde_json::json;

use common::{response_json, TestApp};

async fn open_session(app: &TestApp) -> String {
    let response = app
        .post(
            "/api/v1/admin/session",
            json!({ "password": DEFAULT_ADMIN_PASSCODE }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["tokenType"], "Bearer");
    body["data"]["token"]
        .as_str()
        .expect("token string")
        .to_string()
}

async fn create_feed(app: &TestApp, token: &str, name: &str, quantity: u32) -> String {
    let response = app
        .request(
            Method::POST,
            "/api/v1/feeds",
            Some(json!({
                "name": name,
                "category": "ShrimpFeed",
                "price": "1450.00",
                "initialQuantity": quantity
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["data"]["feed"]["id"]
        .as_str()
        .expect("feed id")
        .to_string()
}

#[tokio::test]
async fn status_and_health_respond() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["service"], "godown-api");

    let response = app.get("/api/v1/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
async fn wrong_passcode_is_unauthorized() {
    let app = TestApp::new().await;
    let response = app
        .post("/api/v1/admin/session", json!({ "password": "1234" }))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn catalog_mutations_require_a_session() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/api/v1/feeds",
            json!({ "name": "Shrimp", "category": "ShrimpFeed", "price": "10" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::POST,
            "/api/v1/feeds",
            Some(json!({ "name": "Shrimp", "category": "ShrimpFeed", "price": "10" })),
            Some("not-a-token"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // reads stay open
    let response = app.get("/api/v1/feeds").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn feed_lifecycle_over_http() {
    let app = TestApp::new().await;
    let token = open_session(&app).await;
    let feed_id = create_feed(&app, &token, "Growel", 30).await;

    let response = app.get(&format!("/api/v1/feeds/{}", feed_id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::PATCH,
            &format!("/api/v1/feeds/{}", feed_id),
            Some(json!({ "name": "Growel Plus" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "Growel Plus");

    let response = app.get("/api/v1/stock/summary").await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["grandTotal"], 30);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/feeds/{}", feed_id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["ledgerEntriesRemoved"], 1);

    let response = app.get(&format!("/api/v1/feeds/{}", feed_id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn manual_stock_adjustment() {
    let app = TestApp::new().await;
    let token = open_session(&app).await;
    let feed_id = create_feed(&app, &token, "Shrimp", 10).await;

    let response = app
        .post(
            &format!("/api/v1/stock/{}/increase", feed_id),
            json!({ "quantity": 5 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["data"]["quantity"], 15);

    let response = app
        .post(
            &format!("/api/v1/stock/{}/decrease", feed_id),
            json!({ "quantity": 20 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["code"], "insufficient_stock");
    assert_eq!(body["details"]["available"], 15);

    let response = app
        .post(
            &format!("/api/v1/stock/{}/decrease", feed_id),
            json!({ "quantity": 0 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post(
            "/api/v1/stock/00000000-0000-0000-0000-000000000000/increase",
            json!({ "quantity": 1 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn movements_loads_transfers_and_logs() {
    let app = TestApp::new().await;
    let token = open_session(&app).await;
    let feed_id = create_feed(&app, &token, "Shrimp", 0).await;

    let response = app
        .post(
            "/api/v1/trucks/movements",
            json!({
                "truckNumber": "AP-39-1234",
                "type": "incoming",
                "items": [{ "feedId": feed_id, "quantity": 40 }]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .post(
            "/api/v1/trucks/movements",
            json!({
                "truckNumber": "AP-39-1234",
                "type": "outgoing",
                "destinations": "Nellore, Ongole",
                "items": [{ "feedId": feed_id, "quantity": 100 }]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["skipped"][0]["available"], 40);
    assert_eq!(body["data"]["movement"]["destinations"], json!(["Nellore", "Ongole"]));

    let response = app
        .post(
            "/api/v1/trucks/loads",
            json!({
                "truckNumber": "SRC-1",
                "stock": [{ "feedId": feed_id, "quantity": 12 }]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .post(
            "/api/v1/transfers",
            json!({
                "sourceTruckNumber": "SRC-1",
                "destTruckNumber": "DST-1",
                "items": [{ "feedId": feed_id, "quantity": 20 }]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response_json(response).await["code"],
        "insufficient_truck_stock"
    );

    let response = app
        .post(
            "/api/v1/transfers",
            json!({
                "sourceTruckNumber": "SRC-1",
                "destTruckNumber": "DST-1",
                "items": [{ "feedId": feed_id, "quantity": 12 }]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.get("/api/v1/trucks/loads/DST-1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["stock"][0]["quantity"], 12);

    let response = app.get("/api/v1/trucks/loads/GHOST").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post(
            "/api/v1/transfers",
            json!({
                "sourceTruckNumber": "GHOST",
                "destTruckNumber": "DST-1",
                "items": [{ "feedId": feed_id, "quantity": 1 }]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response_json(app.get("/api/v1/logs").await).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(4));

    let body = response_json(app.get("/api/v1/logs?action=TruckEntry").await).await;
    let entries = body["data"].as_array().expect("log array");
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["action"] == "TruckEntry"));

    let body = response_json(app.get("/api/v1/snapshot").await).await;
    assert_eq!(body["data"]["feeds"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["trucks"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"]["truckLoads"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"]["directTransfers"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["summary"]["grandTotal"], 40);
}

#[tokio::test]
async fn responses_echo_the_request_id() {
    let app = TestApp::new().await;
    let response = app.get("/api/v1/feeds").await;
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("request id header");
    let body = response_json(response).await;
    assert_eq!(body["meta"]["request_id"], header.as_str());
}
