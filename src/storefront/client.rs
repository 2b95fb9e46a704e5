use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::{markup::render_markup, plan_modal, ModalMarkup, StorefrontSettings};

/// Delay between inserting the hidden modal and revealing it
pub const REVEAL_DELAY: Duration = Duration::from_secs(1);

/// Lifecycle of one page load.
///
/// `Uninitialized -> Fetching -> NotShown | Rendered`, then `Rendered -> Hidden` on close.
/// `NotShown` and `Hidden` are terminal and a client never fetches twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Uninitialized,
    Fetching,
    NotShown,
    Rendered,
    Hidden,
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Settings request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Settings response was not valid: {0}")]
    Parse(String),

    #[error("Invalid settings endpoint: {0}")]
    InvalidUrl(String),
}

/// Where the client loads a shop's settings from
#[async_trait]
pub trait SettingsSource: Send + Sync {
    async fn fetch(&self, shop: &str) -> Result<StorefrontSettings, SourceError>;
}

/// Page mutations the client needs
pub trait RenderPort: Send {
    /// Insert the modal and its styles, still hidden
    fn insert_modal(&mut self, markup: &ModalMarkup);
    fn reveal(&mut self);
    /// Hide without removing the element
    fn hide(&mut self);
}

/// Reads settings from the backend's public read endpoint
pub struct HttpSettingsSource {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpSettingsSource {
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        let base_url = Url::parse(base_url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// `{base}/api/modal-settings/{shop}` with the shop percent-encoded as one segment
    pub fn settings_url(&self, shop: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "modal-settings", shop]);
        Ok(url)
    }
}

#[async_trait]
impl SettingsSource for HttpSettingsSource {
    async fn fetch(&self, shop: &str) -> Result<StorefrontSettings, SourceError> {
        let url = self.settings_url(shop)?;

        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        serde_json::from_slice(&body).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

pub struct StorefrontClient<S, P> {
    source: S,
    port: P,
    state: ClientState,
    reveal_delay: Duration,
}

impl<S: SettingsSource, P: RenderPort> StorefrontClient<S, P> {
    pub fn new(source: S, port: P) -> Self {
        Self {
            source,
            port,
            state: ClientState::Uninitialized,
            reveal_delay: REVEAL_DELAY,
        }
    }

    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Fetch the shop's settings once and render the modal when they are active.
    /// Failures are logged and leave the page untouched.
    pub async fn init(&mut self, shop: Option<&str>) -> ClientState {
        if self.state != ClientState::Uninitialized {
            return self.state;
        }

        let Some(shop) = shop.map(str::trim).filter(|s| !s.is_empty()) else {
            warn!("Welcome modal: no shop in the page context");
            self.state = ClientState::NotShown;
            return self.state;
        };

        self.state = ClientState::Fetching;

        let settings = match self.source.fetch(shop).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Welcome modal: error initializing modal for {}: {}", shop, e);
                self.state = ClientState::NotShown;
                return self.state;
            },
        };

        let Some(content) = plan_modal(&settings) else {
            debug!("Welcome modal inactive for {}", shop);
            self.state = ClientState::NotShown;
            return self.state;
        };

        self.port.insert_modal(&render_markup(&content));
        self.state = ClientState::Rendered;

        tokio::time::sleep(self.reveal_delay).await;
        self.port.reveal();
        info!("Welcome modal shown for {}", shop);

        self.state
    }

    /// Close action. Only a rendered modal can be hidden.
    pub fn close(&mut self) -> ClientState {
        if self.state == ClientState::Rendered {
            self.port.hide();
            self.state = ClientState::Hidden;
        }
        self.state
    }
}
