//! HMAC-SHA256 signing used to authenticate webhook deliveries.
//!
//! Shopify signs every webhook body with the app's secret key and sends the
//! base64 digest in `X-Shopify-Hmac-Sha256`. Comparisons here are constant
//! time.
//!
//! ```rust
//! use shopify_admin::auth::hmac::{compute_signature_base64, verify_signature_base64};
//!
//! let body = br#"{"id":1}"#;
//! let signature = compute_signature_base64(body, "secret");
//! assert_eq!(signature.len(), 44);
//! assert!(verify_signature_base64(body, "secret", &signature));
//! assert!(!verify_signature_base64(body, "other", &signature));
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Signs `message` with `secret` and returns the standard base64 digest.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts keys of any length
pub fn compute_signature_base64(message: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Compares two strings in constant time with respect to their contents.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Returns `true` if `signature` is the base64 HMAC of `message` under `secret`.
#[must_use]
pub fn verify_signature_base64(message: &[u8], secret: &str, signature: &str) -> bool {
    constant_time_compare(&compute_signature_base64(message, secret), signature.trim())
}
