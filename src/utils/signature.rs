// HMAC-SHA256 helpers for Shopify webhook and OAuth callback signatures

use base64::prelude::*;
use ring::hmac;
use subtle::ConstantTimeEq;

/// Header carrying base64(HMAC-SHA256(raw body, app secret))
pub const SHOPIFY_HMAC_HEADER: &str = "x-shopify-hmac-sha256";

fn sign(secret: &str, message: &[u8]) -> hmac::Tag {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    hmac::sign(&key, message)
}

/// base64-encoded HMAC-SHA256 of `body`, the format Shopify puts in webhook headers
pub fn compute_body_signature(secret: &str, body: &[u8]) -> String {
    BASE64_STANDARD.encode(sign(secret, body).as_ref())
}

/// Compare a supplied base64 signature against the body.
///
/// Returns false for a missing, undecodable or mismatched value. The decoded
/// bytes are compared in constant time.
pub fn verify_body_signature(secret: &str, body: &[u8], supplied: Option<&str>) -> bool {
    let Some(supplied) = supplied.map(str::trim).filter(|s| !s.is_empty()) else {
        return false;
    };

    let Ok(supplied_bytes) = BASE64_STANDARD.decode(supplied) else {
        return false;
    };

    let expected = sign(secret, body);
    expected.as_ref().ct_eq(&supplied_bytes).into()
}

/// Lowercase hex HMAC-SHA256, used for the OAuth callback query signature
pub fn compute_hex_signature(secret: &str, message: &str) -> String {
    sign(secret, message.as_bytes())
        .as_ref()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Constant-time comparison of two hex signatures, case-insensitive
pub fn hex_signatures_match(expected: &str, supplied: &str) -> bool {
    let expected = expected.to_ascii_lowercase();
    let supplied = supplied.trim().to_ascii_lowercase();
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}
