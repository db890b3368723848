use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error(
        "Missing X-Hub-Signature-256 header. Did you configure secret token in hook settings?"
    )]
    Missing,

    #[error("Secret validation failed.")]
    Mismatch,
}

/// Verifies a GitHub webhook signature using constant-time comparison.
///
/// GitHub sends `X-Hub-Signature-256: sha256=<hex>`. This function validates
/// the HMAC-SHA256 of the raw request body against that header value.
pub fn verify(secret: &str, body: &[u8], signature_header: &str) -> bool {
    let hex_sig = match signature_header.strip_prefix("sha256=") {
        Some(s) => s,
        None => return false,
    };

    let Ok(expected) = hex::decode(hex_sig) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };

    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// [`verify`] for an optional header value.
pub fn check(secret: &str, body: &[u8], signature_header: Option<&str>) -> Result<(), SignatureError> {
    match signature_header {
        None => Err(SignatureError::Missing),
        Some(sig) if verify(secret, body, sig) => Ok(()),
        Some(_) => Err(SignatureError::Mismatch),
    }
}
