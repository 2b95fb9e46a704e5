// Library exports for the welcome modal backend
// The binary and the integration tests both build the app through these

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod storefront;
pub mod utils;

// Re-export commonly used types
pub use app::{build_router, AppState};
pub use app_config::{AdmissionStrategy, AppConfig, ConfigError};
pub use db::{DieselPool, MIGRATIONS};
pub use middleware::{gate_for, AdmissionGate};
pub use models::{ModalSettings, UpsertModalSettingsRequest};
pub use services::{
    MemorySettingsStore, ModalSettingsService, PgSettingsStore, SessionStore, SettingsStore,
    ShopifyOAuth, StoreError,
};
pub use utils::{AuthError, ServiceError};

use std::sync::Arc;
use tracing::info;

/// Connect to Postgres, apply pending migrations and assemble the shared state
pub async fn initialize_app_state(
    config: AppConfig,
) -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    info!("Initializing database pool...");
    let pool = db::create_diesel_pool(db::DieselDatabaseConfig::from(&config.database)).await?;

    if migrations::should_run_migrations(&config) {
        info!("Running embedded migrations...");
        migrations::run_all_migrations(&config)
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    }

    let store: Arc<dyn SettingsStore> = Arc::new(PgSettingsStore::new(pool));
    state_with_store(config, store).map_err(Into::into)
}

/// Assemble the state around an already constructed settings store
pub fn state_with_store(
    config: AppConfig,
    store: Arc<dyn SettingsStore>,
) -> Result<AppState, reqwest::Error> {
    let sessions = SessionStore::new();
    let gate = gate_for(&config, sessions.clone());
    let oauth = Arc::new(ShopifyOAuth::new(config.shopify.clone())?);

    info!("Write admission strategy: {}", gate.strategy());

    Ok(AppState {
        config: Arc::new(config),
        store,
        gate,
        oauth,
        sessions,
    })
}
