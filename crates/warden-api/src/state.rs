// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::{
    AuthorityResolver, CredentialAuthenticator, MemoryUserStore, TokenCodec, UserStore,
};
use crate::config::AppConfig;
use crate::error::ApiResult;

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers and middleware.
///
/// This is the composition root: every collaborator is constructed here at
/// process start and passed down explicitly. All members are immutable or
/// internally synchronized, so the state clones freely across requests.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<AppConfig>,
    /// Token codec for issuing and verifying tokens.
    pub codec: Arc<TokenCodec>,
    /// Credential authenticator for login and registration.
    pub authenticator: Arc<CredentialAuthenticator>,
    /// Credential persistence.
    pub store: Arc<dyn UserStore>,
    /// Per-request role lookup.
    pub authorities: Arc<dyn AuthorityResolver>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Returns the credential authenticator.
    pub fn authenticator(&self) -> &CredentialAuthenticator {
        &self.authenticator
    }

    /// Returns the user store.
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Returns the authority resolver.
    pub fn authorities(&self) -> &Arc<dyn AuthorityResolver> {
        &self.authorities
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing [`AppState`].
pub struct AppStateBuilder {
    config: Option<AppConfig>,
    store: Option<Arc<dyn UserStore>>,
    authorities: Option<Arc<dyn AuthorityResolver>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            store: None,
            authorities: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the user store.
    pub fn store(mut self, store: Arc<dyn UserStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the authority resolver.
    pub fn authorities(mut self, authorities: Arc<dyn AuthorityResolver>) -> Self {
        self.authorities = Some(authorities);
        self
    }

    /// Builds the state.
    ///
    /// The token codec is constructed from the configured auth section, so
    /// this fails on an unusable signing secret. When store or resolver are
    /// not supplied, both default to one shared in-memory store.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();
        let codec = Arc::new(TokenCodec::new(config.auth.clone())?);

        let (store, authorities) = match (self.store, self.authorities) {
            (Some(store), Some(authorities)) => (store, authorities),
            (store, authorities) => {
                let shared = Arc::new(MemoryUserStore::new());
                let store = store.unwrap_or_else(|| shared.clone() as Arc<dyn UserStore>);
                let authorities =
                    authorities.unwrap_or_else(|| shared as Arc<dyn AuthorityResolver>);
                (store, authorities)
            }
        };

        let authenticator = Arc::new(CredentialAuthenticator::new(store.clone()));

        Ok(AppState {
            config: Arc::new(config),
            codec,
            authenticator,
            store,
            authorities,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
