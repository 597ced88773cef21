//! Request extractors for header-driven access modes.
//!
//! - [`preview::Preview`] -- Draft visibility from the `x-preview-token` header.
//! - [`revalidate::RevalidateSecret`] -- Guards the revalidation webhooks.

use hmac::{Hmac, Mac};
use sha2::Sha256;

pub mod preview;
pub mod revalidate;

type HmacSha256 = Hmac<Sha256>;

/// Both sides are MACed under this key and the fixed-length tags compared.
const COMPARE_KEY: &[u8] = b"atrium-shared-secret";

/// Constant-time equality of a configured secret and the one a caller sent.
pub fn secrets_match(expected: &str, provided: &str) -> bool {
    let Ok(mut expected_mac) = HmacSha256::new_from_slice(COMPARE_KEY) else {
        return false;
    };
    let mut provided_mac = expected_mac.clone();
    expected_mac.update(expected.as_bytes());
    provided_mac.update(provided.as_bytes());
    provided_mac
        .verify_slice(&expected_mac.finalize().into_bytes())
        .is_ok()
}
