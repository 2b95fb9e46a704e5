// Application state and router assembly
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    app_config::AppConfig,
    handlers::{self, health},
    middleware::{cors_layer, AdmissionGate},
    services::{SessionStore, SettingsStore, ShopifyOAuth},
};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn SettingsStore>,
    pub gate: Arc<dyn AdmissionGate>,
    pub oauth: Arc<ShopifyOAuth>,
    pub sessions: SessionStore,
}

/// Every route the service exposes, with CORS and request tracing applied
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(handlers::modal_settings_routes(state.clone()))
        .merge(handlers::auth_routes())
        .merge(handlers::webhook_routes())
        .merge(handlers::storefront_routes())
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
