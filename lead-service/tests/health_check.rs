mod common;

use axum::http::StatusCode;
use common::{body_text, config_with_database_url, valid_lead, TestApp, TEST_DATABASE_URL};
use lead_service::startup::Application;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn();

    let (status, body) = app.get_json("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "lead-service");
}

#[tokio::test]
async fn greeting_routes_respond() {
    let app = TestApp::spawn();

    let (status, body) = app.get_json("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = app.get_json("/api/hello").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello from the backend API!");
}

#[tokio::test]
async fn readiness_follows_the_store() {
    let (status, _) = TestApp::spawn().get_json("/ready").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = TestApp::with_failing_store().get_json("/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = TestApp::without_store().get_json("/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn diagnostics_without_store_reports_not_configured() {
    let app = TestApp::without_store();

    let (status, body) = app.get_json("/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "running");
    assert_eq!(body["database"], "not_configured");
    assert_eq!(body["connection_status"], "not_connected");
    assert_eq!(body["database_url_set"], false);
    assert_eq!(body["database_name_set"], false);
    assert_eq!(body["collections"], serde_json::json!([]));
}

#[tokio::test]
async fn diagnostics_lists_collections_without_leaking_configuration() {
    let app = TestApp::spawn();
    app.post_lead(&valid_lead()).await;

    let response = app.get("/test").await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(body["database"], "connected");
    assert_eq!(body["connection_status"], "connected");
    assert_eq!(body["database_url_set"], true);
    assert_eq!(body["database_name_set"], true);
    assert_eq!(body["collections"], serde_json::json!(["lead"]));
    assert!(body.get("database_error").is_none());
    assert!(!text.contains(TEST_DATABASE_URL));
}

#[tokio::test]
async fn diagnostics_reports_store_errors() {
    let app = TestApp::with_failing_store();

    let (status, body) = app.get_json("/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "error");
    let excerpt = body["database_error"].as_str().unwrap();
    assert!(!excerpt.is_empty());
    assert!(excerpt.chars().count() <= 50);
}

#[tokio::test]
async fn metrics_endpoint_serves_text() {
    let app = TestApp::spawn();

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
}

#[tokio::test]
async fn malformed_database_url_does_not_stop_startup() {
    let app = Application::build(config_with_database_url("not-a-mongo-uri")).await;

    assert!(app.is_ok());
}

#[tokio::test]
async fn malformed_database_url_is_reported_as_unavailable_storage() {
    let app = TestApp::with_connected_store(config_with_database_url("not-a-mongo-uri")).await;

    let (status, body) = app.get_json("/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "error");
    assert_eq!(body["connection_status"], "not_connected");
    assert_eq!(body["database_name"], "leads_test");
    assert_eq!(body["database_url_set"], true);
    let excerpt = body["database_error"].as_str().unwrap();
    assert!(!excerpt.is_empty());
    assert!(excerpt.chars().count() <= 50);

    let (status, _) = app.get_json("/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = app.post_lead(&valid_lead()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Storage unavailable");
    assert_eq!(app.mailer().send_count(), 0);
}
