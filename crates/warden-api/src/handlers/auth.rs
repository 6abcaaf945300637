// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use std::collections::HashSet;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extractors::Auth;
use crate::response::{AuthResponse, RegisterResponse};
use crate::state::AppState;

/// Role granted to every newly registered user.
const DEFAULT_ROLE: &str = "user";

// =============================================================================
// Register
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Username or email.
    pub username: String,
    /// Password.
    pub password: String,
}

/// POST /api/v1/auth/register
///
/// Registers a new user and returns the stored identifier.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let roles: HashSet<String> = [DEFAULT_ROLE.to_string()].into_iter().collect();
    let credential = state
        .authenticator()
        .register(&request.username, &request.password, roles)
        .await?;

    tracing::info!(identifier = %credential.identifier, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            identifier: credential.identifier,
        }),
    ))
}

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub username: String,
    /// Password.
    pub password: String,
}

/// POST /api/v1/auth/login
///
/// Verifies credentials and returns a signed token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let identity = state
        .authenticator()
        .authenticate(&request.username, &request.password)
        .await?;

    let token = state
        .codec()
        .issue(identity.subject(), serde_json::Map::new(), Utc::now())?;

    tracing::info!(identifier = %identity.subject(), "user logged in");

    Ok(Json(AuthResponse::new(token, state.codec().validity_secs())))
}

// =============================================================================
// Current User
// =============================================================================

/// Current user response.
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    /// Authenticated identifier.
    pub identifier: String,
    /// Roles as currently granted.
    pub roles: Vec<String>,
}

/// GET /api/v1/auth/me
///
/// Returns the identity the filter attached to this request.
pub async fn current_user(Auth(ctx): Auth) -> ApiResult<impl IntoResponse> {
    let mut roles: Vec<String> = ctx.roles.iter().cloned().collect();
    roles.sort();

    Ok(Json(CurrentUserResponse {
        identifier: ctx.subject,
        roles,
    }))
}
