mod common;

use axum::http::StatusCode;
use common::{setup_failing_app, setup_test_app, TEST_HOST};
use serde_json::Value;
use welcome_modal_backend::app_config::AdmissionStrategy;

const UNINSTALL_PAYLOAD: &[u8] = br#"{"id":1,"domain":"a.myshopify.com"}"#;

#[tokio::test]
async fn test_signed_webhook_is_acknowledged() {
    let app = setup_test_app(AdmissionStrategy::Signature);

    let response = app
        .post("/webhooks/app-uninstalled")
        .raw_json(UNINSTALL_PAYLOAD)
        .header("x-shopify-shop-domain", "a.myshopify.com")
        .signed()
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await;
    assert_eq!(body["received"], true);
}

#[tokio::test]
async fn test_unsigned_webhook_is_rejected() {
    // Webhooks are always signature checked, whatever the write admission strategy
    let app = setup_test_app(AdmissionStrategy::Session);

    let response = app
        .post("/webhooks/app-uninstalled")
        .raw_json(UNINSTALL_PAYLOAD)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post("/webhooks/app-uninstalled")
        .raw_json(UNINSTALL_PAYLOAD)
        .header("x-shopify-hmac-sha256", &common::sign(b"something else"))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_modal_script_points_at_app_origin() {
    let app = setup_test_app(AdmissionStrategy::Signature);

    let response = app.get("/modal.js").send().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/javascript"));

    let script = response.text().await;
    assert!(script.contains(&format!("https://{}", TEST_HOST)));
    assert!(!script.contains("__APP_ORIGIN__"));
    assert!(script.contains("/api/modal-settings/"));
}

#[tokio::test]
async fn test_health_reports_store_state() {
    let healthy = setup_test_app(AdmissionStrategy::Signature);
    let response = healthy.get("/health").send().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["components"]["admission"], "signature");

    let failing = setup_failing_app();
    let response = failing.get("/health").send().await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await;
    assert_eq!(body["status"], "degraded");
}
