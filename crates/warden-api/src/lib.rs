// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-api
//!
//! Stateless bearer-token authentication service.
//!
//! This crate provides the authentication core (HS256 token issuance and
//! verification, credential checking against a pluggable user store) together
//! with the HTTP surface that exposes it: a per-request authentication filter,
//! login/registration handlers, and the server assembly.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{
    AuthContext, AuthorityResolver, Claims, Credential, CredentialAuthenticator, CredentialError,
    MemoryUserStore, StoreError, TokenCodec, TokenConfig, TokenError, UserStore,
};
pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use server::ApiServer;
pub use state::AppState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
