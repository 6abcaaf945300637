// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The claim set carried inside a signed token.
///
/// The registered claims (RFC 7519) are all mandatory on this deployment:
/// tokens without a subject, issuer, audience or the two timestamps do not
/// verify. Custom claims supplied at issue time are flattened into the
/// payload alongside them.
///
/// Roles are deliberately not part of the claim set. Authorization data is
/// resolved per request from the user store, so a role change takes effect
/// on the next request instead of surviving inside already-issued tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the authenticated identifier.
    pub sub: String,

    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,

    /// Custom claims, flattened into the payload.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Returns the subject identifier.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Returns the expiration time as a `DateTime`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the issued-at time as a `DateTime`.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Claims {
        Claims {
            sub: "alice@example.com".to_string(),
            iss: "warden".to_string(),
            aud: "warden-clients".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_custom_claims_flatten() {
        let mut claims = sample();
        claims
            .extra
            .insert("tenant".to_string(), serde_json::json!("acme"));

        let payload = serde_json::to_value(&claims).unwrap();
        assert_eq!(payload["sub"], "alice@example.com");
        assert_eq!(payload["tenant"], "acme");

        let parsed: Claims = serde_json::from_value(payload).unwrap();
        assert_eq!(parsed.extra["tenant"], "acme");
    }

    #[test]
    fn test_registered_claims_required() {
        // A payload with no subject must not deserialize.
        let payload = serde_json::json!({
            "iss": "warden",
            "aud": "warden-clients",
            "iat": 1_700_000_000,
            "exp": 1_700_003_600,
        });
        assert!(serde_json::from_value::<Claims>(payload).is_err());
    }

    #[test]
    fn test_timestamp_accessors() {
        let claims = sample();
        assert_eq!(claims.expires_at().unwrap().timestamp(), claims.exp);
        assert_eq!(claims.issued_at().unwrap().timestamp(), claims.iat);
    }
}
