// OAuth install handshake: GET /auth starts it, GET /auth/callback completes it

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::collections::BTreeMap;
use time::Duration;
use tracing::info;

use crate::{
    app::AppState,
    services::{
        shopify_oauth::{OAUTH_STATE_COOKIE, SESSION_COOKIE},
        ShopSession,
    },
    utils::auth_errors::{log_auth_failure, AuthError},
};

/// How long a begun handshake may take before its state cookie lapses
const STATE_COOKIE_MINUTES: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct BeginAuthParams {
    pub shop: Option<String>,
}

fn state_cookie(state: String) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, state))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(STATE_COOKIE_MINUTES))
        .build()
}

fn delete_state_cookie() -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, ""))
        .path("/")
        .max_age(Duration::seconds(-1))
        .build()
}

// The app is framed inside the Shopify admin, so the session cookie must be cross-site
fn session_cookie(session: &ShopSession) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.id.clone()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .build()
}

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Redirect the merchant to the Shopify authorization screen
/// GET /auth?shop=<domain>
pub async fn begin_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<BeginAuthParams>,
) -> Response {
    let shop = match params.shop.as_deref().map(str::trim) {
        Some(shop) if !shop.is_empty() => shop.to_string(),
        _ => {
            let error = AuthError::MissingShop;
            log_auth_failure("Install request", &error);
            return error.into_response();
        },
    };

    match state.oauth.begin_auth(&shop) {
        Ok(request) => {
            info!("Starting OAuth handshake for {}", shop);
            let jar = jar.add(state_cookie(request.state));
            (jar, found(request.url)).into_response()
        },
        Err(e) => {
            log_auth_failure("Install request", &e);
            e.into_response()
        },
    }
}

/// Finish the handshake and open the embedded admin
/// GET /auth/callback
pub async fn auth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());

    let session = match state
        .oauth
        .validate_callback(&params, expected_state.as_deref())
        .await
    {
        Ok(session) => session,
        Err(e) => {
            log_auth_failure("Error during auth callback", &e);
            return (jar.add(delete_state_cookie()), e).into_response();
        },
    };

    let location = format!("/admin?shop={}", session.shop);
    let jar = jar
        .add(delete_state_cookie())
        .add(session_cookie(&session));
    state.sessions.insert(session).await;

    (jar, found(location)).into_response()
}
