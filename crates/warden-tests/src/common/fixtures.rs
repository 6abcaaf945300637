// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Pre-built test data for consistent and reproducible testing.

use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use warden_api::{ApiServer, AppConfig, AppState, TokenConfig};

/// Raw signing secret used across tests; 32 bytes so it passes key-length
/// validation once base64-encoded.
pub const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

/// Identifier registered by [`seeded_state`].
pub const TEST_USER: &str = "alice@example.com";

/// Password registered by [`seeded_state`].
pub const TEST_PASSWORD: &str = "secret123";

/// Token configuration with the test secret.
pub fn test_token_config() -> TokenConfig {
    TokenConfig::new(BASE64.encode(TEST_SECRET))
        .with_issuer("warden-test")
        .with_audience("warden-test-clients")
}

/// Application configuration with the test secret.
pub fn test_app_config() -> AppConfig {
    AppConfig {
        auth: test_token_config(),
        ..AppConfig::default()
    }
}

/// State over an empty in-memory store.
pub fn test_state() -> AppState {
    AppState::builder()
        .config(test_app_config())
        .build()
        .expect("test state should build")
}

/// State with one registered user ([`TEST_USER`] / [`TEST_PASSWORD`]).
pub async fn seeded_state() -> AppState {
    let state = test_state();
    state
        .authenticator()
        .register(
            TEST_USER,
            TEST_PASSWORD,
            ["user".to_string()].into_iter().collect(),
        )
        .await
        .expect("seeding the test user should succeed");
    state
}

/// Assembled router for the given state.
pub fn test_router(state: &AppState) -> Router {
    ApiServer::new(state.clone()).router()
}
