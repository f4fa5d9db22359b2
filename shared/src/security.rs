//! Content digest, HMAC manifests, and constant-time comparisons (C2).
//!
//! Grounded in the corpus's `auth::jwt::constant_time_compare` pattern
//! (`subtle::ConstantTimeEq`) and `auth::api_key`'s token validity check,
//! generalized into the dispatch orchestrator's identity-hash component.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const MIN_HMAC_SECRET_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error("HMAC secret must be at least {MIN_HMAC_SECRET_LEN} bytes")]
    SecretTooShort,
    #[error("path contains a traversal segment")]
    PathTraversal,
}

/// SHA-256 hex digest of `bytes`.
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Verify that `signature` is the SHA-256 digest of `payload`.
///
/// The comparison is against the *supplied* `signature`, not against a
/// caller-provided `expected_digest` — comparing `expected` to `digest`
/// instead of `signature` to `digest` was a reviewer-noted logic flaw in an
/// earlier iteration of this check and would accept any `signature` as long
/// as the caller also happened to pass the right `expected_digest`.
pub fn verify_signature(payload: &[u8], signature: &str, expected_digest: &str) -> bool {
    let computed = digest(payload);
    constant_time_eq(&computed, signature) && constant_time_eq(&computed, expected_digest)
}

/// HMAC-SHA256 of `payload` under `secret`, hex-encoded.
pub fn sign_manifest(payload: &[u8], secret: &[u8]) -> Result<String, SecurityError> {
    if secret.len() < MIN_HMAC_SECRET_LEN {
        return Err(SecurityError::SecretTooShort);
    }
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify an HMAC manifest tag in constant time.
pub fn verify_manifest(payload: &[u8], tag: &str, secret: &[u8]) -> Result<bool, SecurityError> {
    let expected = sign_manifest(payload, secret)?;
    Ok(constant_time_eq(&expected, tag))
}

/// Constant-time string comparison (avoids the corpus's timing-attack bug
/// where length is checked first and characters compared until the first
/// mismatch).
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// URL-decode `raw` and reject it if, after decoding, any path segment
/// equals `..`. Must decode *before* checking — checking the raw (still
/// encoded) string lets `%2e%2e` slip through.
pub fn sanitize_path(raw: &str) -> Result<String, SecurityError> {
    let decoded = urlencoding::decode(raw)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| raw.to_string());

    if decoded.split('/').any(|segment| segment == "..") {
        return Err(SecurityError::PathTraversal);
    }

    Ok(decoded)
}

/// Case-insensitive origin allowlist match.
pub fn origin_allowed(origin: &str, allowlist: &[String]) -> bool {
    allowlist
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(origin))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    pub subject: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl Token {
    /// `now == expires_at` is invalid — the boundary belongs to expiry, not
    /// validity.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at && !self.revoked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(digest(b"hello"), digest(b"hello"));
        assert_ne!(digest(b"hello"), digest(b"world"));
    }

    #[test]
    fn verify_signature_round_trips() {
        let payload = b"order-manifest";
        let sig = digest(payload);
        assert!(verify_signature(payload, &sig, &sig));
        assert!(!verify_signature(payload, "deadbeef", &sig));
    }

    #[test]
    fn sign_manifest_rejects_short_secret() {
        let err = sign_manifest(b"payload", b"short");
        assert!(matches!(err, Err(SecurityError::SecretTooShort)));
    }

    #[test]
    fn manifest_round_trips_with_valid_secret() {
        let secret = b"0123456789abcdef0123456789abcdef";
        let tag = sign_manifest(b"payload", secret).unwrap();
        assert!(verify_manifest(b"payload", &tag, secret).unwrap());
        assert!(!verify_manifest(b"tampered", &tag, secret).unwrap());
    }

    #[test]
    fn path_traversal_after_url_decoding_is_rejected() {
        assert!(sanitize_path("a/%2e%2e/b").is_err());
        assert!(sanitize_path("a/../b").is_err());
        assert!(sanitize_path("a/b/c").is_ok());
    }

    #[test]
    fn origin_allowlist_is_case_insensitive() {
        let allowlist = vec!["Example.com".to_string()];
        assert!(origin_allowed("example.COM", &allowlist));
        assert!(!origin_allowed("evil.com", &allowlist));
    }

    #[test]
    fn token_boundary_at_expiry_is_invalid() {
        let now = Utc::now();
        let token = Token {
            value: "t".into(),
            subject: "s".into(),
            expires_at: now,
            revoked: false,
        };
        assert!(!token.is_valid(now));
        assert!(token.is_valid(now - Duration::seconds(1)));
    }
}
