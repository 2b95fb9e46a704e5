// Authentication-specific errors: write admission and the OAuth install handshake

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing shop parameter")]
    MissingShop,

    #[error("Invalid shop domain: {0}")]
    InvalidShop(String),

    #[error("Missing or invalid request signature")]
    InvalidSignature,

    #[error("No authenticated session")]
    MissingSession,

    #[error("Session does not belong to shop {0}")]
    SessionShopMismatch(String),

    #[error("OAuth state does not match")]
    StateMismatch,

    #[error("OAuth callback signature is invalid")]
    InvalidCallbackSignature,

    #[error("OAuth callback is missing parameter: {0}")]
    MissingCallbackParam(&'static str),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Request body could not be read")]
    UnreadableBody,
}

#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
}

impl AuthError {
    /// Convert to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingShop | AuthError::InvalidShop(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidSignature
            | AuthError::MissingSession
            | AuthError::SessionShopMismatch(_) => StatusCode::UNAUTHORIZED,
            AuthError::UnreadableBody => StatusCode::BAD_REQUEST,
            // Anything that goes wrong completing the handshake is a failed exchange
            AuthError::StateMismatch
            | AuthError::InvalidCallbackSignature
            | AuthError::MissingCallbackParam(_)
            | AuthError::TokenExchange(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingShop => "MISSING_SHOP",
            AuthError::InvalidShop(_) => "INVALID_SHOP",
            AuthError::InvalidSignature => "INVALID_SIGNATURE",
            AuthError::MissingSession => "MISSING_SESSION",
            AuthError::SessionShopMismatch(_) => "SESSION_SHOP_MISMATCH",
            AuthError::StateMismatch => "STATE_MISMATCH",
            AuthError::InvalidCallbackSignature => "INVALID_CALLBACK_SIGNATURE",
            AuthError::MissingCallbackParam(_) => "MISSING_CALLBACK_PARAM",
            AuthError::TokenExchange(_) => "TOKEN_EXCHANGE_FAILED",
            AuthError::UnreadableBody => "UNREADABLE_BODY",
        }
    }

    fn public_message(&self) -> String {
        match self {
            AuthError::StateMismatch
            | AuthError::InvalidCallbackSignature
            | AuthError::MissingCallbackParam(_)
            | AuthError::TokenExchange(_) => "Error during authentication".to_string(),
            AuthError::InvalidSignature
            | AuthError::MissingSession
            | AuthError::SessionShopMismatch(_) => "Unauthorized".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let response = AuthErrorResponse {
            error: self.public_message(),
            code: self.error_code(),
            status: status.as_u16(),
        };

        (status, Json(response)).into_response()
    }
}

/// Log an authentication failure with the context it happened in
pub fn log_auth_failure(context: &str, error: &AuthError) {
    match error.status_code() {
        StatusCode::INTERNAL_SERVER_ERROR => {
            tracing::error!(code = error.error_code(), "{}: {}", context, error)
        },
        _ => tracing::warn!(code = error.error_code(), "{}: {}", context, error),
    }
}
