//! Webhook signature verification.
//!
//! The provider signs the raw request body with HMAC-SHA256 using the
//! shared webhook secret and sends the lowercase hex digest in the
//! `X-Signature` header.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

fn mac(secret: &[u8], body: &[u8]) -> Result<HmacSha256, ApiError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| ApiError::Internal(format!("hmac key: {e}")))?;
    mac.update(body);
    Ok(mac)
}

/// Computes the hex signature for `body`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the HMAC cannot be keyed.
pub fn sign(secret: &[u8], body: &[u8]) -> Result<String, ApiError> {
    Ok(hex::encode(mac(secret, body)?.finalize().into_bytes()))
}

/// Verifies `signature_hex` against `body` in constant time.
///
/// # Errors
///
/// Returns [`ApiError::InvalidSignature`] if the header is not valid hex
/// or does not match.
pub fn verify(secret: &[u8], body: &[u8], signature_hex: &str) -> Result<(), ApiError> {
    let expected = hex::decode(signature_hex.trim()).map_err(|_| ApiError::InvalidSignature)?;
    mac(secret, body)?
        .verify_slice(&expected)
        .map_err(|_| ApiError::InvalidSignature)
}
