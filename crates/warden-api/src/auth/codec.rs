// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issuance and verification.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Claims;

/// Minimum decoded signing-key length in bytes (256 bits for HMAC-SHA256).
pub const MIN_SECRET_BYTES: usize = 32;

// =============================================================================
// TokenError
// =============================================================================

/// Reasons a token fails to verify or to be produced.
///
/// Callers at the HTTP boundary collapse every decode variant into a single
/// unauthorized outcome; the variants exist so that logs can tell an expired
/// token apart from a tampered one.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The supplied token string was empty.
    #[error("token is empty")]
    Empty,

    /// The token does not match the three-part signed format.
    #[error("malformed token")]
    Malformed,

    /// The signature does not verify under the configured key.
    #[error("token signature mismatch")]
    SignatureMismatch,

    /// The token's expiration time has passed.
    #[error("token has expired")]
    Expired,

    /// The token declares an algorithm other than HS256.
    #[error("unsupported token algorithm")]
    Unsupported,

    /// The issuer claim does not match the configured issuer.
    #[error("token issuer mismatch")]
    InvalidIssuer,

    /// The audience claim does not match the configured audience.
    #[error("token audience mismatch")]
    InvalidAudience,

    /// The configured signing key is unusable.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// Signing failed while producing a token.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

// =============================================================================
// TokenConfig
// =============================================================================

/// Token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Base64-encoded signing secret. Must decode to at least
    /// [`MIN_SECRET_BYTES`] bytes.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Issuer written into every token and required on verification.
    pub issuer: String,
    /// Audience written into every token and required on verification.
    pub audience: String,
    /// Token validity duration in milliseconds.
    pub validity_ms: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by the operator
            issuer: "warden".to_string(),
            audience: "warden-clients".to_string(),
            validity_ms: 3_600_000, // 1 hour
        }
    }
}

impl TokenConfig {
    /// Creates a new configuration with the given base64-encoded secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Sets the validity duration in milliseconds.
    pub fn with_validity_ms(mut self, validity_ms: u64) -> Self {
        self.validity_ms = validity_ms;
        self
    }

    /// Decodes the configured secret, enforcing the minimum key length.
    pub fn decoded_secret(&self) -> Result<Vec<u8>, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::InvalidKey(
                "signing secret is not configured".to_string(),
            ));
        }
        let bytes = BASE64
            .decode(&self.secret)
            .map_err(|e| TokenError::InvalidKey(format!("secret is not valid base64: {e}")))?;
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(TokenError::InvalidKey(format!(
                "secret must decode to at least {MIN_SECRET_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(bytes)
    }
}

// =============================================================================
// TokenCodec
// =============================================================================

/// Encodes and verifies signed authentication tokens.
///
/// The codec is immutable after construction and safe to share across request
/// handlers; issue and decode touch only their inputs and the stored key.
#[derive(Clone)]
pub struct TokenCodec {
    issuer: String,
    audience: String,
    validity_ms: u64,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenCodec {
    /// Creates a codec from the given configuration.
    ///
    /// Fails if the secret is missing, not base64, or shorter than 256 bits
    /// once decoded.
    pub fn new(config: TokenConfig) -> Result<Self, TokenError> {
        let key_bytes = config.decoded_secret()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        // Expiry is checked explicitly below at millisecond resolution.
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            issuer: config.issuer,
            audience: config.audience,
            validity_ms: config.validity_ms,
            encoding_key: Arc::new(EncodingKey::from_secret(&key_bytes)),
            decoding_key: Arc::new(DecodingKey::from_secret(&key_bytes)),
            validation: Arc::new(validation),
        })
    }

    /// Builds and signs a token for `subject`, valid from `now` for the
    /// configured duration.
    ///
    /// `extra_claims` are merged into the payload next to the registered
    /// claims. The result is fully deterministic for identical inputs.
    pub fn issue(
        &self,
        subject: &str,
        extra_claims: serde_json::Map<String, serde_json::Value>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let now_ms = now.timestamp_millis();
        let claims = Claims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now_ms / 1000,
            exp: (now_ms + self.validity_ms as i64) / 1000,
            extra: extra_claims,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// A token is accepted only when its signature verifies under the
    /// configured key, its issuer and audience match exactly, and the current
    /// time is strictly before its expiration.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        if token.trim().is_empty() {
            return Err(TokenError::Empty);
        }

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(classify_decode_error)?;
        let claims = data.claims;

        if Utc::now().timestamp_millis() >= claims.exp * 1000 {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Returns the configured validity duration in whole seconds.
    pub fn validity_secs(&self) -> i64 {
        (self.validity_ms / 1000) as i64
    }

    /// Returns the configured validity duration in milliseconds.
    pub fn validity_ms(&self) -> u64 {
        self.validity_ms
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("validity_ms", &self.validity_ms)
            .finish()
    }
}

/// Maps the JWT library's error kinds onto the codec's taxonomy.
fn classify_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => TokenError::Unsupported,
        ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
        ErrorKind::InvalidAudience => TokenError::InvalidAudience,
        ErrorKind::InvalidToken
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => TokenError::Malformed,
        _ => TokenError::Malformed,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TokenConfig {
        TokenConfig::new(BASE64.encode("0123456789abcdef0123456789abcdef"))
            .with_issuer("warden-test")
            .with_audience("warden-test-clients")
    }

    fn test_codec() -> TokenCodec {
        TokenCodec::new(test_config()).unwrap()
    }

    #[test]
    fn test_issue_and_decode() {
        let codec = test_codec();
        let token = codec
            .issue("alice@example.com", serde_json::Map::new(), Utc::now())
            .unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.subject(), "alice@example.com");
        assert_eq!(claims.iss, "warden-test");
        assert_eq!(claims.aud, "warden-test-clients");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_issue_is_deterministic() {
        let codec = test_codec();
        let now = Utc::now();
        let a = codec.issue("alice", serde_json::Map::new(), now).unwrap();
        let b = codec.issue("alice", serde_json::Map::new(), now).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_extra_claims_survive_round_trip() {
        let codec = test_codec();
        let mut extra = serde_json::Map::new();
        extra.insert("tenant".to_string(), serde_json::json!("acme"));

        let token = codec.issue("alice", extra, Utc::now()).unwrap();
        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.extra["tenant"], "acme");
    }

    #[test]
    fn test_empty_token() {
        let codec = test_codec();
        assert!(matches!(codec.decode(""), Err(TokenError::Empty)));
        assert!(matches!(codec.decode("   "), Err(TokenError::Empty)));
    }

    #[test]
    fn test_malformed_token() {
        let codec = test_codec();
        assert!(matches!(
            codec.decode("not-a-token"),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_tampered_payload() {
        let codec = test_codec();
        let token = codec
            .issue("alice", serde_json::Map::new(), Utc::now())
            .unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        // Flip one character of the payload segment, keeping it valid base64url.
        let mut payload: Vec<u8> = parts[1].bytes().collect();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        let tampered = format!(
            "{}.{}.{}",
            parts[0],
            String::from_utf8(payload).unwrap(),
            parts[2]
        );

        assert!(matches!(
            codec.decode(&tampered),
            Err(TokenError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let issuing = test_codec();
        let other = TokenCodec::new(TokenConfig {
            secret: BASE64.encode("ffffffffffffffffffffffffffffffff"),
            ..test_config()
        })
        .unwrap();

        let token = issuing
            .issue("alice", serde_json::Map::new(), Utc::now())
            .unwrap();
        assert!(test_codec().decode(&token).is_ok());
        assert!(matches!(
            other.decode(&token),
            Err(TokenError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_issuer_mismatch() {
        let issuing = test_codec();
        let verifying = TokenCodec::new(test_config().with_issuer("someone-else")).unwrap();

        let token = issuing
            .issue("alice", serde_json::Map::new(), Utc::now())
            .unwrap();
        assert!(matches!(
            verifying.decode(&token),
            Err(TokenError::InvalidIssuer)
        ));
    }

    #[test]
    fn test_audience_mismatch() {
        let issuing = test_codec();
        let verifying = TokenCodec::new(test_config().with_audience("another-service")).unwrap();

        let token = issuing
            .issue("alice", serde_json::Map::new(), Utc::now())
            .unwrap();
        assert!(matches!(
            verifying.decode(&token),
            Err(TokenError::InvalidAudience)
        ));
    }

    #[test]
    fn test_expired_token() {
        let codec = TokenCodec::new(test_config().with_validity_ms(1)).unwrap();
        let token = codec
            .issue("alice", serde_json::Map::new(), Utc::now())
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(matches!(codec.decode(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_unsupported_algorithm() {
        let codec = test_codec();
        let claims = Claims {
            sub: "alice".to_string(),
            iss: "warden-test".to_string(),
            aud: "warden-test-clients".to_string(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
            extra: serde_json::Map::new(),
        };
        let key_bytes = test_config().decoded_secret().unwrap();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(&key_bytes),
        )
        .unwrap();

        assert!(matches!(codec.decode(&token), Err(TokenError::Unsupported)));
    }

    #[test]
    fn test_secret_validation() {
        // Missing secret
        assert!(matches!(
            TokenConfig::default().decoded_secret(),
            Err(TokenError::InvalidKey(_))
        ));
        // Not base64
        assert!(matches!(
            TokenConfig::new("!!not-base64!!").decoded_secret(),
            Err(TokenError::InvalidKey(_))
        ));
        // Too short once decoded
        assert!(matches!(
            TokenConfig::new(BASE64.encode("short")).decoded_secret(),
            Err(TokenError::InvalidKey(_))
        ));
        // Long enough
        assert!(test_config().decoded_secret().is_ok());
    }
}
