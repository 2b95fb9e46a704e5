use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::app::AppState;

const MODAL_SCRIPT: &str = include_str!("../../assets/modal.js");

/// Placeholder in the script replaced by the public app origin
pub const APP_ORIGIN_PLACEHOLDER: &str = "__APP_ORIGIN__";

/// Storefront script installed as a script tag on the merchant's theme
/// GET /modal.js
pub async fn modal_script(State(state): State<AppState>) -> Response {
    let script = MODAL_SCRIPT.replace(APP_ORIGIN_PLACEHOLDER, &state.config.shopify.app_origin());

    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=300"),
        ],
        script,
    )
        .into_response()
}
