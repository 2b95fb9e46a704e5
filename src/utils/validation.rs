// Validation utilities for shop domains and string fields

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static SHOP_DOMAIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9\-]*\.myshopify\.com$").expect("valid shop domain regex")
});

/// Trim and lowercase a shop domain so lookups and writes share one key
pub fn normalize_shop_domain(shop: &str) -> String {
    shop.trim().to_lowercase()
}

/// Whether `shop` is a `<name>.myshopify.com` domain
pub fn is_valid_shop_domain(shop: &str) -> bool {
    SHOP_DOMAIN_REGEX.is_match(shop.trim())
}

/// `validator` hook for request DTOs carrying a shop domain
pub fn validate_shop_domain_field(shop: &str) -> Result<(), ValidationError> {
    if is_valid_shop_domain(shop) {
        Ok(())
    } else {
        let mut error = ValidationError::new("shop_domain");
        error.message = Some("shopDomain must be a <name>.myshopify.com domain".into());
        Err(error)
    }
}
