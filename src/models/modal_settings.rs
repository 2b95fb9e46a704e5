// Welcome modal settings - one row per shop

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::modal_settings;
use crate::utils::validation::validate_shop_domain_field;

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// Stored modal configuration for a single shop.
///
/// Serialized with the column names so the storefront script can read
/// `button_text` straight off the read endpoint.
#[derive(
    Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize, Deserialize,
)]
#[diesel(table_name = modal_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ModalSettings {
    pub id: i32,
    pub shop_domain: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub button_text: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row for the insert half of the upsert
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = modal_settings)]
pub struct NewModalSettings {
    pub shop_domain: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub button_text: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields replaced on conflict. `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = modal_settings)]
#[diesel(treat_none_as_null = true)]
pub struct ModalSettingsChangeset {
    pub title: Option<String>,
    pub content: Option<String>,
    pub button_text: Option<String>,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

impl NewModalSettings {
    pub fn changeset(&self) -> ModalSettingsChangeset {
        ModalSettingsChangeset {
            title: self.title.clone(),
            content: self.content.clone(),
            button_text: self.button_text.clone(),
            active: self.active,
            updated_at: self.updated_at,
        }
    }
}

impl ModalSettings {
    /// Find the settings row for a shop
    pub async fn find_by_shop(
        conn: &mut AsyncPgConnection,
        shop_domain: &str,
    ) -> Result<Option<ModalSettings>, diesel::result::Error> {
        modal_settings::table
            .filter(modal_settings::shop_domain.eq(shop_domain))
            .select(ModalSettings::as_select())
            .first(conn)
            .await
            .optional()
    }

    /// Insert-or-replace keyed by `shop_domain`, executed as one statement.
    /// `created_at` keeps its original value on conflict.
    pub async fn upsert(
        conn: &mut AsyncPgConnection,
        new_settings: &NewModalSettings,
    ) -> Result<ModalSettings, diesel::result::Error> {
        diesel::insert_into(modal_settings::table)
            .values(new_settings)
            .on_conflict(modal_settings::shop_domain)
            .do_update()
            .set(new_settings.changeset())
            .returning(ModalSettings::as_returning())
            .get_result(conn)
            .await
    }

    /// Number of rows stored for a shop. Always 0 or 1 given the unique key.
    pub async fn count_for_shop(
        conn: &mut AsyncPgConnection,
        shop_domain: &str,
    ) -> Result<i64, diesel::result::Error> {
        modal_settings::table
            .filter(modal_settings::shop_domain.eq(shop_domain))
            .count()
            .get_result(conn)
            .await
    }
}

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Body of `POST /api/modal-settings`
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertModalSettingsRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "shopDomain is required"))]
    #[validate(custom = "validate_shop_domain_field")]
    pub shop_domain: String,

    pub title: Option<String>,

    pub content: Option<String>,

    pub button_text: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl UpsertModalSettingsRequest {
    /// Build the row to write, stamping both timestamps with `now`
    pub fn into_new_settings(self, now: DateTime<Utc>) -> NewModalSettings {
        NewModalSettings {
            shop_domain: self.shop_domain,
            title: self.title,
            content: self.content,
            button_text: self.button_text,
            active: self.active,
            created_at: now,
            updated_at: now,
        }
    }
}
