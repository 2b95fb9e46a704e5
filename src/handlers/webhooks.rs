use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::info;

use crate::{
    app::AppState,
    utils::{
        auth_errors::{log_auth_failure, AuthError},
        signature::{verify_body_signature, SHOPIFY_HMAC_HEADER},
    },
};

/// Acknowledge a signed Shopify webhook. The payload itself is not processed.
/// POST /webhooks/{topic}
pub async fn receive_webhook(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let supplied = headers
        .get(SHOPIFY_HMAC_HEADER)
        .and_then(|value| value.to_str().ok());

    if !verify_body_signature(&state.config.shopify.api_secret, &body, supplied) {
        let error = AuthError::InvalidSignature;
        log_auth_failure(&format!("Webhook {}", topic), &error);
        return error.into_response();
    }

    let shop = headers
        .get("x-shopify-shop-domain")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown shop");
    info!("Webhook {} received from {} ({} bytes)", topic, shop, body.len());

    Json(json!({ "received": true })).into_response()
}
