// Read/upsert operations for per-shop welcome modal settings

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

use crate::{
    app::AppState,
    models::{ModalSettings, UpsertModalSettingsRequest},
    services::settings_store::SettingsStore,
    utils::{service_error::ServiceError, validation::normalize_shop_domain},
};

pub struct ModalSettingsService {
    store: Arc<dyn SettingsStore>,
}

impl ModalSettingsService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(state.store.clone())
    }

    pub fn with_store(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Settings for a shop, `None` when the shop has not configured a modal yet
    #[instrument(skip(self))]
    pub async fn get(&self, shop_domain: &str) -> Result<Option<ModalSettings>, ServiceError> {
        let shop_domain = normalize_shop_domain(shop_domain);

        self.store.find_by_shop(&shop_domain).await.map_err(|e| {
            error!("Failed to load modal settings for {}: {}", shop_domain, e);
            ServiceError::from(e)
        })
    }

    /// Insert or fully replace the settings for `request.shop_domain`
    #[instrument(skip(self, request), fields(shop = %request.shop_domain))]
    pub async fn upsert(
        &self,
        mut request: UpsertModalSettingsRequest,
    ) -> Result<ModalSettings, ServiceError> {
        request.shop_domain = normalize_shop_domain(&request.shop_domain);
        request.validate()?;

        let new_settings = request.into_new_settings(Utc::now());
        let shop_domain = new_settings.shop_domain.clone();

        let stored = self.store.upsert(new_settings).await.map_err(|e| {
            error!("Failed to upsert modal settings for {}: {}", shop_domain, e);
            ServiceError::from(e)
        })?;

        info!(
            "Modal settings saved for {} (id {}, active {})",
            stored.shop_domain, stored.id, stored.active
        );

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::settings_store::MemorySettingsStore;

    fn request(shop: &str, active: bool) -> UpsertModalSettingsRequest {
        UpsertModalSettingsRequest {
            shop_domain: shop.to_string(),
            title: Some("Welcome".to_string()),
            content: Some("Hi!".to_string()),
            button_text: Some("Shop now".to_string()),
            active,
        }
    }

    #[tokio::test]
    async fn test_upsert_then_get_round_trips() {
        let service = ModalSettingsService::with_store(Arc::new(MemorySettingsStore::new()));

        let stored = service.upsert(request("a.myshopify.com", true)).await.unwrap();
        let fetched = service.get("a.myshopify.com").await.unwrap().unwrap();

        assert_eq!(stored, fetched);
        assert_eq!(fetched.title.as_deref(), Some("Welcome"));
        assert_eq!(fetched.content.as_deref(), Some("Hi!"));
        assert_eq!(fetched.button_text.as_deref(), Some("Shop now"));
        assert!(fetched.active);
    }

    #[tokio::test]
    async fn test_repeated_upsert_keeps_one_row() {
        let store = Arc::new(MemorySettingsStore::new());
        let service = ModalSettingsService::with_store(store.clone());

        let first = service.upsert(request("a.myshopify.com", true)).await.unwrap();
        let second = service.upsert(request("a.myshopify.com", true)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_unseen_shop_is_empty() {
        let service = ModalSettingsService::with_store(Arc::new(MemorySettingsStore::new()));
        assert!(service.get("new.myshopify.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_shop_domain_is_normalized() {
        let service = ModalSettingsService::with_store(Arc::new(MemorySettingsStore::new()));

        service.upsert(request(" A.myshopify.com ", true)).await.unwrap();

        let fetched = service.get("a.myshopify.com").await.unwrap().unwrap();
        assert_eq!(fetched.shop_domain, "a.myshopify.com");
    }

    #[tokio::test]
    async fn test_invalid_shop_is_rejected_without_write() {
        let store = Arc::new(MemorySettingsStore::new());
        let service = ModalSettingsService::with_store(store.clone());

        let result = service.upsert(request("", true)).await;

        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
        assert!(store.is_empty().await);
    }
}
