// Storefront side of the welcome modal: decide whether to show it and drive the page through a port

pub mod client;
pub mod markup;

pub use client::{
    ClientState, HttpSettingsSource, RenderPort, SettingsSource, SourceError, StorefrontClient,
};
pub use markup::{escape_html, render_markup, ModalMarkup, MODAL_ELEMENT_ID};

use serde::Deserialize;

/// Button label used when a shop saved no button text
pub const DEFAULT_BUTTON_TEXT: &str = "Close";

/// Settings as served by `GET /api/modal-settings/{shop}`.
/// Every field is optional because a shop without settings is served `{}`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StorefrontSettings {
    pub title: Option<String>,
    pub content: Option<String>,
    pub button_text: Option<String>,
    pub active: Option<bool>,
}

/// What the modal shows once it is decided that it should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub title: String,
    pub content: String,
    pub button_text: String,
}

/// Only an explicit `active: true` renders a modal.
pub fn plan_modal(settings: &StorefrontSettings) -> Option<ModalContent> {
    if settings.active != Some(true) {
        return None;
    }

    Some(ModalContent {
        title: settings.title.clone().unwrap_or_default(),
        content: settings.content.clone().unwrap_or_default(),
        button_text: settings
            .button_text
            .clone()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BUTTON_TEXT.to_string()),
    })
}
