// Persistence seam for modal settings
// PostgreSQL in production, in-memory for tests and database-less local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    db::DieselPool,
    models::{ModalSettings, NewModalSettings},
};

#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached (pool exhausted, connection refused)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The statement itself failed
    #[error("Query failed: {0}")]
    Query(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        StoreError::Query(error.to_string())
    }
}

impl<E: std::error::Error + 'static> From<bb8::RunError<E>> for StoreError {
    fn from(error: bb8::RunError<E>) -> Self {
        StoreError::Unavailable(error.to_string())
    }
}

/// Keyed storage of one settings row per shop domain
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn find_by_shop(&self, shop_domain: &str) -> Result<Option<ModalSettings>, StoreError>;

    /// Atomic insert-or-replace. Concurrent writes for a shop resolve last-write-wins.
    async fn upsert(&self, new_settings: NewModalSettings) -> Result<ModalSettings, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

// =============================================================================
// POSTGRES
// =============================================================================

#[derive(Clone)]
pub struct PgSettingsStore {
    pool: DieselPool,
}

impl PgSettingsStore {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// Rows stored for a shop, used to check the unique-key invariant
    pub async fn count_for_shop(&self, shop_domain: &str) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;
        Ok(ModalSettings::count_for_shop(&mut conn, shop_domain).await?)
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn find_by_shop(&self, shop_domain: &str) -> Result<Option<ModalSettings>, StoreError> {
        let mut conn = self.pool.get().await?;
        Ok(ModalSettings::find_by_shop(&mut conn, shop_domain).await?)
    }

    async fn upsert(&self, new_settings: NewModalSettings) -> Result<ModalSettings, StoreError> {
        let mut conn = self.pool.get().await?;
        Ok(ModalSettings::upsert(&mut conn, &new_settings).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        // Getting a connection is enough, the pool tests it on checkout
        let conn = self.pool.get().await?;
        drop(conn);
        Ok(())
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

#[derive(Default)]
pub struct MemorySettingsStore {
    rows: RwLock<HashMap<String, ModalSettings>>,
    next_id: AtomicI32,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows held across all shops
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn find_by_shop(&self, shop_domain: &str) -> Result<Option<ModalSettings>, StoreError> {
        Ok(self.rows.read().await.get(shop_domain).cloned())
    }

    async fn upsert(&self, new_settings: NewModalSettings) -> Result<ModalSettings, StoreError> {
        // Write lock spans the read-modify-write so concurrent upserts serialize
        let mut rows = self.rows.write().await;

        let row = match rows.get_mut(&new_settings.shop_domain) {
            Some(existing) => {
                let changes = new_settings.changeset();
                existing.title = changes.title;
                existing.content = changes.content;
                existing.button_text = changes.button_text;
                existing.active = changes.active;
                existing.updated_at = changes.updated_at;
                existing.clone()
            },
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                debug!("Inserting settings row {} for {}", id, new_settings.shop_domain);
                let row = ModalSettings {
                    id,
                    shop_domain: new_settings.shop_domain.clone(),
                    title: new_settings.title,
                    content: new_settings.content,
                    button_text: new_settings.button_text,
                    active: new_settings.active,
                    created_at: new_settings.created_at,
                    updated_at: new_settings.updated_at,
                };
                rows.insert(new_settings.shop_domain, row.clone());
                row
            },
        };

        Ok(row)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
