// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Credential verification and registration.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use thiserror::Error;

use super::password;
use super::store::{Credential, StoreError, UserStore};
use super::AuthContext;

// =============================================================================
// CredentialError
// =============================================================================

/// Errors from credential verification and registration.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The identifier/password pair did not verify.
    ///
    /// Deliberately a single variant: an unknown identifier and a wrong
    /// password are indistinguishable to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The identifier is already registered.
    #[error("identifier already registered")]
    DuplicateIdentifier,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// The backing store failed.
    #[error(transparent)]
    Store(StoreError),
}

// =============================================================================
// CredentialAuthenticator
// =============================================================================

/// Verifies username/password pairs and registers new credentials.
#[derive(Clone)]
pub struct CredentialAuthenticator {
    store: Arc<dyn UserStore>,
}

impl CredentialAuthenticator {
    /// Creates an authenticator over the given store.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Verifies `password` for `identifier` and returns the authenticated
    /// identity on success.
    ///
    /// An absent identifier burns the same hashing cost as a mismatched
    /// password, and both produce [`CredentialError::InvalidCredentials`].
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<AuthContext, CredentialError> {
        let credential = self
            .store
            .find_by_identifier(identifier)
            .await
            .map_err(CredentialError::Store)?;

        match credential {
            Some(credential) => {
                if password::verify_password(password, &credential.password_hash) {
                    tracing::debug!(identifier = %credential.identifier, "credentials verified");
                    Ok(AuthContext::new(credential.identifier, credential.roles))
                } else {
                    Err(CredentialError::InvalidCredentials)
                }
            }
            None => {
                let _ = password::verify_password(password, placeholder_hash());
                Err(CredentialError::InvalidCredentials)
            }
        }
    }

    /// Hashes `password` and stores a new credential with the given roles.
    pub async fn register(
        &self,
        identifier: &str,
        password: &str,
        roles: HashSet<String>,
    ) -> Result<Credential, CredentialError> {
        let password_hash =
            password::hash_password(password).map_err(|e| CredentialError::Hashing(e.to_string()))?;

        let credential = Credential {
            identifier: identifier.to_string(),
            password_hash,
            roles,
        };

        self.store.save(credential).await.map_err(|e| match e {
            StoreError::Duplicate(_) => CredentialError::DuplicateIdentifier,
            other => CredentialError::Store(other),
        })
    }
}

impl std::fmt::Debug for CredentialAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialAuthenticator").finish()
    }
}

/// Hash verified against when the identifier does not exist, so both failure
/// paths cost one Argon2 comparison.
fn placeholder_hash() -> &'static str {
    static PLACEHOLDER: OnceLock<String> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| password::hash_password("warden-placeholder-credential").unwrap_or_default())
}

// =============================================================================
// Tests
// =============================================================================
