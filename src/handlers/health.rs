use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

use crate::app::AppState;

// Health check handler
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let (healthy, store_health) = match state.store.health_check().await {
        Ok(()) => (
            true,
            json!({
                "status": "healthy",
                "error": null
            }),
        ),
        Err(e) => {
            error!("Settings store health check failed: {}", e);
            (
                false,
                json!({
                    "status": "unhealthy",
                    "error": format!("Settings store unavailable: {}", e)
                }),
            )
        },
    };

    let response = json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "service": "welcome-modal-backend",
        "timestamp": timestamp,
        "components": {
            "settings_store": store_health,
            "admission": state.gate.strategy().to_string()
        }
    });

    if healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
