// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication core.
//!
//! This module provides:
//! - Token issuance and verification (HMAC-SHA256)
//! - Credential verification and registration
//! - Password hashing
//! - The per-request authenticated identity
//! - User store and authority resolver abstractions

mod claims;
mod codec;
mod context;
mod credentials;
pub mod password;
mod store;

pub use claims::Claims;
pub use codec::{TokenCodec, TokenConfig, TokenError};
pub use context::AuthContext;
pub use credentials::{CredentialAuthenticator, CredentialError};
pub use store::{AuthorityResolver, Credential, MemoryUserStore, StoreError, UserStore};
