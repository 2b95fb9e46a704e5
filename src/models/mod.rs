pub mod modal_settings;

// Re-export common types
pub use modal_settings::{
    ModalSettings, ModalSettingsChangeset, NewModalSettings, UpsertModalSettingsRequest,
};
