// Settings API: read by the storefront script, written by the embedded admin

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::{
    app::AppState, models::UpsertModalSettingsRequest, services::ModalSettingsService,
    utils::service_error::ServiceError,
};

/// Settings for a shop, `{}` when it has none
/// GET /api/modal-settings/{shop_domain}
pub async fn get_modal_settings(
    State(state): State<AppState>,
    Path(shop_domain): Path<String>,
) -> Response {
    let service = ModalSettingsService::new(&state);

    match service.get(&shop_domain).await {
        Ok(Some(settings)) => Json(settings).into_response(),
        Ok(None) => Json(json!({})).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create or replace the settings for a shop
/// POST /api/modal-settings
pub async fn upsert_modal_settings(
    State(state): State<AppState>,
    payload: Result<Json<UpsertModalSettingsRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected modal settings body: {}", rejection.body_text());
            return ServiceError::from(rejection).into_response();
        },
    };

    let service = ModalSettingsService::new(&state);

    match service.upsert(request).await {
        Ok(settings) => Json(settings).into_response(),
        Err(e) => {
            if let ServiceError::ValidationError(msg) = &e {
                warn!("Invalid modal settings: {}", msg);
            }
            e.into_response()
        },
    }
}
