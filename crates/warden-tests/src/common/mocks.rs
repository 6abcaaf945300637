// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Mock implementations for testing failure paths.

use std::collections::HashSet;

use async_trait::async_trait;
use warden_api::{AuthorityResolver, Credential, StoreError, UserStore};

/// Authority resolver whose backing store is always unavailable.
pub struct FailingAuthorityResolver;

#[async_trait]
impl AuthorityResolver for FailingAuthorityResolver {
    async fn roles_for(&self, _identifier: &str) -> Result<HashSet<String>, StoreError> {
        Err(StoreError::Backend("role store unavailable".to_string()))
    }
}

/// User store whose backend is always unavailable.
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn find_by_identifier(&self, _identifier: &str) -> Result<Option<Credential>, StoreError> {
        Err(StoreError::Backend("user store unavailable".to_string()))
    }

    async fn save(&self, _credential: Credential) -> Result<Credential, StoreError> {
        Err(StoreError::Backend("user store unavailable".to_string()))
    }
}
