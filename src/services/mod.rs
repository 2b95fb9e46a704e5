// Services module
// Business logic layer for the application

pub mod modal_settings;
pub mod session_store;
pub mod settings_store;
pub mod shopify_oauth;

// Re-export commonly used services
pub use modal_settings::ModalSettingsService;
pub use session_store::{SessionStore, ShopSession};
pub use settings_store::{MemorySettingsStore, PgSettingsStore, SettingsStore, StoreError};
pub use shopify_oauth::{AuthorizationRequest, ShopifyOAuth, OAUTH_STATE_COOKIE, SESSION_COOKIE};
