//! Bearer token claim decoding.
//!
//! The backend issues JWTs whose payload carries the subject, a `ROLE`
//! claim, and the standard `exp` expiry. This module decodes that payload
//! without verifying the signature: verification belongs to the backend, the
//! client only needs to read the expiry to schedule its warning.
//!
//! Decoding never fails loudly. A token with fewer than two segments, a
//! payload that is not valid base64url, or content that is not valid JSON
//! all yield `None`, which callers treat the same as "no expiry information".

use base64::prelude::*;
use serde::Deserialize;

/// Claims decoded from a bearer token's payload segment.
///
/// Only the fields the client consumes are modeled; unknown claims are
/// ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Expiry as seconds since the Unix epoch. Absent on tokens the backend
    /// issues without an expiry; the watchdog treats that as "never arm".
    #[serde(default)]
    pub exp: Option<i64>,

    /// The subject (username) the token was issued to.
    #[serde(default)]
    pub sub: Option<String>,

    /// The role claim, `ROOT` for administrators.
    #[serde(default, rename = "ROLE")]
    pub role: Option<String>,
}

/// Decodes the payload segment of a bearer token.
///
/// Splits on `.`, base64url-decodes the second segment, and parses it as
/// JSON. Returns `None` on any malformation; this is a recoverable outcome,
/// never an error.
///
/// # Example
///
/// ```
/// use magiccode_client::token::decode;
///
/// // header.payload.signature with payload {"exp":1735689600}
/// let token = "eyJhbGciOiJIUzI1NiJ9.eyJleHAiOjE3MzU2ODk2MDB9.sig";
/// let claims = decode(token).unwrap();
/// assert_eq!(claims.exp, Some(1_735_689_600));
///
/// assert!(decode("not-a-token").is_none());
/// ```
#[must_use]
pub fn decode(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;

    // The backend emits unpadded base64url, but tolerate padded payloads.
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| BASE64_URL_SAFE.decode(payload))
        .ok()?;

    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a structurally valid token around the given payload JSON.
    fn token_with_payload(payload: &str) -> String {
        let header = BASE64_URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let body = BASE64_URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{header}.{body}.fake-signature")
    }

    #[test]
    fn decode_extracts_expiry() {
        let token = token_with_payload(r#"{"exp":1735689600}"#);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.exp, Some(1_735_689_600));
    }

    #[test]
    fn decode_extracts_subject_and_role() {
        let token = token_with_payload(r#"{"exp":1735689600,"sub":"admin","ROLE":"ROOT"}"#);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("admin"));
        assert_eq!(claims.role.as_deref(), Some("ROOT"));
    }

    #[test]
    fn decode_ignores_unknown_claims() {
        let token = token_with_payload(r#"{"exp":1,"iat":0,"custom":{"nested":true}}"#);
        assert!(decode(&token).is_some());
    }

    #[test]
    fn decode_missing_expiry_still_succeeds() {
        let token = token_with_payload(r#"{"sub":"admin"}"#);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn decode_single_segment_returns_none() {
        assert!(decode("only-one-segment").is_none());
    }

    #[test]
    fn decode_empty_token_returns_none() {
        assert!(decode("").is_none());
    }

    #[test]
    fn decode_invalid_base64_returns_none() {
        assert!(decode("header.!!!not-base64!!!.sig").is_none());
    }

    #[test]
    fn decode_invalid_json_payload_returns_none() {
        let body = BASE64_URL_SAFE_NO_PAD.encode(b"not json at all");
        assert!(decode(&format!("header.{body}.sig")).is_none());
    }

    #[test]
    fn decode_accepts_padded_base64() {
        // 10 payload bytes, so the encoding ends in "==".
        let body = BASE64_URL_SAFE.encode(br#"{"exp":12}"#);
        assert!(body.ends_with("=="));
        let claims = decode(&format!("header.{body}.sig")).unwrap();
        assert_eq!(claims.exp, Some(12));
    }

    #[test]
    fn decode_tolerates_missing_signature_segment() {
        // Two segments are enough; the signature is never inspected.
        let body = BASE64_URL_SAFE_NO_PAD.encode(br#"{"exp":2}"#);
        let claims = decode(&format!("header.{body}")).unwrap();
        assert_eq!(claims.exp, Some(2));
    }
}
