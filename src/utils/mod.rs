// Utility modules

pub mod auth_errors;
pub mod service_error;
pub mod signature;
pub mod validation;

pub use auth_errors::{log_auth_failure, AuthError, AuthErrorResponse};
pub use service_error::ServiceError;
pub use signature::{
    compute_body_signature, compute_hex_signature, hex_signatures_match, verify_body_signature,
    SHOPIFY_HMAC_HEADER,
};
pub use validation::{is_valid_shop_domain, normalize_shop_domain, validate_shop_domain_field};
