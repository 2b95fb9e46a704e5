use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::{app_config::AppConfig, utils::signature::SHOPIFY_HMAC_HEADER};

/// CORS for storefront pages reading settings from another origin.
///
/// `*` in `CORS_ALLOWED_ORIGINS` allows any origin; otherwise only the listed
/// origins are reflected.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(SHOPIFY_HMAC_HEADER),
        ]);

    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("CORS: ignoring invalid origin {:?}", origin);
                None
            },
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
