// Online sessions created by completed OAuth handshakes
// Held in memory only; a restart requires merchants to re-open the app

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A shop session established by the OAuth callback
#[derive(Clone)]
pub struct ShopSession {
    pub id: String,
    pub shop: String,
    pub access_token: String,
    pub scope: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for ShopSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopSession")
            .field("id", &self.id)
            .field("shop", &self.shop)
            .field("access_token", &"***")
            .field("scope", &self.scope)
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, ShopSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session, replacing any earlier session for the same shop
    pub async fn insert(&self, session: ShopSession) {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| existing.shop != session.shop);
        sessions.insert(session.id.clone(), session);
    }

    pub async fn get(&self, session_id: &str) -> Option<ShopSession> {
        self.sessions.read().await.get(session_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, shop: &str) -> ShopSession {
        ShopSession {
            id: id.to_string(),
            shop: shop.to_string(),
            access_token: "shpat_secret".to_string(),
            scope: "write_script_tags".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_new_session_replaces_previous_for_shop() {
        let store = SessionStore::new();
        store.insert(session("one", "a.myshopify.com")).await;
        store.insert(session("two", "b.myshopify.com")).await;
        store.insert(session("three", "a.myshopify.com")).await;

        assert!(store.get("one").await.is_none());
        assert_eq!(store.get("three").await.unwrap().shop, "a.myshopify.com");
        assert_eq!(store.len().await, 2);
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let rendered = format!("{:?}", session("one", "a.myshopify.com"));
        assert!(!rendered.contains("shpat_secret"));
    }
}
