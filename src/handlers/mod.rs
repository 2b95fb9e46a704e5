pub mod auth;
pub mod health;
pub mod modal_settings;
pub mod storefront;
pub mod webhooks;

use crate::{app::AppState, middleware::admission_middleware};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

// Settings API; writes pass the admission gate first
pub fn modal_settings_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/modal-settings",
            post(modal_settings::upsert_modal_settings)
                .route_layer(middleware::from_fn_with_state(state, admission_middleware)),
        )
        .route(
            "/api/modal-settings/{shop_domain}",
            get(modal_settings::get_modal_settings),
        )
}

// OAuth install handshake
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth", get(auth::begin_auth))
        .route("/auth/callback", get(auth::auth_callback))
}

pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhooks/{topic}", post(webhooks::receive_webhook))
}

pub fn storefront_routes() -> Router<AppState> {
    Router::new().route("/modal.js", get(storefront::modal_script))
}
