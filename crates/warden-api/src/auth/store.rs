// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User store and authority resolution.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

// =============================================================================
// Credential
// =============================================================================

/// A stored credential.
///
/// The identifier is immutable once registered; the password hash is replaced
/// only through an explicit password change. The plaintext password is never
/// stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Unique identifier (email or username).
    pub identifier: String,
    /// One-way Argon2 hash of the password, PHC string format.
    pub password_hash: String,
    /// Granted role names.
    pub roles: HashSet<String>,
}

// =============================================================================
// StoreError
// =============================================================================

/// Errors from the user store and authority resolver.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier is already registered.
    #[error("identifier already registered: {0}")]
    Duplicate(String),

    /// No credential exists for the identifier.
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// The backing store could not be reached.
    #[error("user store unavailable: {0}")]
    Backend(String),
}

// =============================================================================
// Traits
// =============================================================================

/// Credential persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a credential by its identifier.
    ///
    /// An absent identifier is `Ok(None)`; `Err` is reserved for backend
    /// failures.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Credential>, StoreError>;

    /// Persists a new credential.
    async fn save(&self, credential: Credential) -> Result<Credential, StoreError>;
}

/// Per-request role lookup.
///
/// Resolved fresh on every authenticated request so that role changes and
/// revocations take effect without reissuing tokens.
#[async_trait]
pub trait AuthorityResolver: Send + Sync {
    /// Returns the roles currently granted to the identifier.
    async fn roles_for(&self, identifier: &str) -> Result<HashSet<String>, StoreError>;
}

// =============================================================================
// MemoryUserStore
// =============================================================================

/// In-process user store.
///
/// Backs the demonstration deployment; a database-backed implementation
/// plugs in through the same traits.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, Credential>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored credentials.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Returns `true` if the store holds no credentials.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self.users.read().await.get(identifier).cloned())
    }

    async fn save(&self, credential: Credential) -> Result<Credential, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&credential.identifier) {
            return Err(StoreError::Duplicate(credential.identifier));
        }
        users.insert(credential.identifier.clone(), credential.clone());
        Ok(credential)
    }
}

#[async_trait]
impl AuthorityResolver for MemoryUserStore {
    async fn roles_for(&self, identifier: &str) -> Result<HashSet<String>, StoreError> {
        self.users
            .read()
            .await
            .get(identifier)
            .map(|credential| credential.roles.clone())
            .ok_or_else(|| StoreError::UnknownIdentifier(identifier.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(identifier: &str) -> Credential {
        Credential {
            identifier: identifier.to_string(),
            password_hash: "$argon2id$test".to_string(),
            roles: ["user"].into_iter().map(String::from).collect(),
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let store = MemoryUserStore::new();
        assert!(store.is_empty().await);

        store.save(credential("alice@example.com")).await.unwrap();
        assert_eq!(store.len().await, 1);

        let found = store
            .find_by_identifier("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.identifier, "alice@example.com");

        assert!(store
            .find_by_identifier("bob@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_save() {
        let store = MemoryUserStore::new();
        store.save(credential("alice@example.com")).await.unwrap();

        let result = store.save(credential("alice@example.com")).await;
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_roles_for() {
        let store = MemoryUserStore::new();
        store.save(credential("alice@example.com")).await.unwrap();

        let roles = store.roles_for("alice@example.com").await.unwrap();
        assert!(roles.contains("user"));

        let result = store.roles_for("bob@example.com").await;
        assert!(matches!(result, Err(StoreError::UnknownIdentifier(_))));
    }
}
