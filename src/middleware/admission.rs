// Admission gate for write requests to the settings API
// Runs before the handler; a rejected request never reaches the settings service

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    app::AppState,
    app_config::{AdmissionStrategy, AppConfig},
    services::{session_store::SessionStore, shopify_oauth::SESSION_COOKIE},
    utils::{
        auth_errors::{log_auth_failure, AuthError},
        signature::{verify_body_signature, SHOPIFY_HMAC_HEADER},
        validation::normalize_shop_domain,
    },
};

/// Largest write body the gate will buffer for verification
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Decides whether a write request comes from a trusted Shopify context
#[async_trait]
pub trait AdmissionGate: Send + Sync {
    fn strategy(&self) -> AdmissionStrategy;

    /// `body` is the raw request body exactly as received
    async fn admit(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), AuthError>;
}

/// Keyed-hash check of the raw body against `x-shopify-hmac-sha256`
pub struct SignatureGate {
    secret: String,
}

impl SignatureGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl AdmissionGate for SignatureGate {
    fn strategy(&self) -> AdmissionStrategy {
        AdmissionStrategy::Signature
    }

    async fn admit(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), AuthError> {
        let supplied = headers
            .get(SHOPIFY_HMAC_HEADER)
            .and_then(|value| value.to_str().ok());

        if verify_body_signature(&self.secret, body, supplied) {
            Ok(())
        } else {
            Err(AuthError::InvalidSignature)
        }
    }
}

/// Requires the session cookie set by a completed OAuth callback.
/// A session may only write the settings of its own shop.
pub struct SessionGate {
    sessions: SessionStore,
}

impl SessionGate {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }
}

#[derive(Deserialize)]
struct TargetShop {
    #[serde(rename = "shopDomain", default)]
    shop_domain: String,
}

#[async_trait]
impl AdmissionGate for SessionGate {
    fn strategy(&self) -> AdmissionStrategy {
        AdmissionStrategy::Session
    }

    async fn admit(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), AuthError> {
        let jar = CookieJar::from_headers(headers);
        let session_id = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(AuthError::MissingSession)?;

        let session = self
            .sessions
            .get(&session_id)
            .await
            .ok_or(AuthError::MissingSession)?;

        // Unparseable bodies fall through to the handler's own validation
        if let Ok(target) = serde_json::from_slice::<TargetShop>(body) {
            let target_shop = normalize_shop_domain(&target.shop_domain);
            if !target_shop.is_empty() && target_shop != session.shop {
                return Err(AuthError::SessionShopMismatch(target_shop));
            }
        }

        Ok(())
    }
}

/// Build the one gate this deployment uses
pub fn gate_for(config: &AppConfig, sessions: SessionStore) -> Arc<dyn AdmissionGate> {
    match config.admission {
        AdmissionStrategy::Signature => Arc::new(SignatureGate::new(&config.shopify.api_secret)),
        AdmissionStrategy::Session => Arc::new(SessionGate::new(sessions)),
    }
}

/// Middleware that buffers the body, asks the gate, and only then forwards the request
pub async fn admission_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to buffer write request body: {}", e);
            return AuthError::UnreadableBody.into_response();
        },
    };

    if let Err(e) = state.gate.admit(&parts.headers, &bytes).await {
        log_auth_failure("Write request rejected", &e);
        return e.into_response();
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    next.run(request).await
}
