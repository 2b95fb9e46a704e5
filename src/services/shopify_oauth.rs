// Shopify OAuth authorization-code handshake for the embedded app install

use chrono::Utc;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use subtle::ConstantTimeEq;
use tracing::{info, instrument};
use url::Url;

use crate::{
    app_config::ShopifyConfig,
    services::session_store::ShopSession,
    utils::{
        auth_errors::AuthError,
        signature::{compute_hex_signature, hex_signatures_match},
        validation::{is_valid_shop_domain, normalize_shop_domain},
    },
};

/// Cookie carrying the nonce between `/auth` and `/auth/callback`
pub const OAUTH_STATE_COOKIE: &str = "shopify_app_state";

/// Cookie identifying a completed session
pub const SESSION_COOKIE: &str = "shopify_app_session";

pub const CALLBACK_PATH: &str = "/auth/callback";

/// Where a begun handshake sends the merchant
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default)]
    scope: String,
}

pub struct ShopifyOAuth {
    config: ShopifyConfig,
    http: reqwest::Client,
    admin_base_url: Option<String>,
}

impl ShopifyOAuth {
    pub fn new(config: ShopifyConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            config,
            http,
            admin_base_url: None,
        })
    }

    /// Send token exchanges to `base` instead of `https://{shop}`
    pub fn with_admin_base_url(mut self, base: impl Into<String>) -> Self {
        self.admin_base_url = Some(base.into().trim_end_matches('/').to_string());
        self
    }

    fn redirect_uri(&self) -> String {
        format!("{}{}", self.config.app_origin(), CALLBACK_PATH)
    }

    /// Build the authorization URL for `shop` with a fresh nonce
    pub fn begin_auth(&self, shop: &str) -> Result<AuthorizationRequest, AuthError> {
        let shop = normalize_shop_domain(shop);
        if !is_valid_shop_domain(&shop) {
            return Err(AuthError::InvalidShop(shop));
        }

        let state = generate_nonce();
        let url = Url::parse_with_params(
            &format!("https://{}/admin/oauth/authorize", shop),
            &[
                ("client_id", self.config.api_key.as_str()),
                ("scope", self.config.scopes.join(",").as_str()),
                ("redirect_uri", self.redirect_uri().as_str()),
                ("state", state.as_str()),
            ],
        )
        .map_err(|_| AuthError::InvalidShop(shop.clone()))?;

        Ok(AuthorizationRequest {
            url: url.to_string(),
            state,
        })
    }

    /// Verify the `hmac` query parameter Shopify appends to the callback.
    ///
    /// The message is every other parameter except `signature`, sorted by key,
    /// as `key=value` pairs joined with `&`.
    pub fn verify_callback_hmac(&self, params: &BTreeMap<String, String>) -> bool {
        let Some(supplied) = params.get("hmac") else {
            return false;
        };

        let message = params
            .iter()
            .filter(|(key, _)| key.as_str() != "hmac" && key.as_str() != "signature")
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        let expected = compute_hex_signature(&self.config.api_secret, &message);
        hex_signatures_match(&expected, supplied)
    }

    /// Complete the handshake: check state, shop and signature, then exchange the code.
    #[instrument(skip_all)]
    pub async fn validate_callback(
        &self,
        params: &BTreeMap<String, String>,
        expected_state: Option<&str>,
    ) -> Result<ShopSession, AuthError> {
        let shop = params
            .get("shop")
            .map(|s| normalize_shop_domain(s))
            .ok_or(AuthError::MissingCallbackParam("shop"))?;
        if !is_valid_shop_domain(&shop) {
            return Err(AuthError::InvalidShop(shop));
        }

        let code = params
            .get("code")
            .ok_or(AuthError::MissingCallbackParam("code"))?;
        let state = params
            .get("state")
            .ok_or(AuthError::MissingCallbackParam("state"))?;

        let expected_state = expected_state.ok_or(AuthError::StateMismatch)?;
        if !bool::from(state.as_bytes().ct_eq(expected_state.as_bytes())) {
            return Err(AuthError::StateMismatch);
        }

        if !self.verify_callback_hmac(params) {
            return Err(AuthError::InvalidCallbackSignature);
        }

        let token = self.exchange_code(&shop, code).await?;

        info!("OAuth handshake completed for {}", shop);

        Ok(ShopSession {
            id: uuid::Uuid::new_v4().to_string(),
            shop,
            access_token: token.access_token,
            scope: token.scope,
            created_at: Utc::now(),
        })
    }

    async fn exchange_code(&self, shop: &str, code: &str) -> Result<AccessTokenResponse, AuthError> {
        let base = self
            .admin_base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}", shop));
        let url = format!("{}/admin/oauth/access_token", base);

        let response = self
            .http
            .post(&url)
            .json(&AccessTokenRequest {
                client_id: &self.config.api_key,
                client_secret: &self.config.api_secret,
                code,
            })
            .send()
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        response
            .json::<AccessTokenResponse>()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("unexpected token response: {}", e)))
    }
}

/// 32 random bytes, hex encoded
fn generate_nonce() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
