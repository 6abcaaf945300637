// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and handling.
//!
//! Every error leaving the service is rendered as a flat JSON object
//! `{"error": "<reason>", "message": "<text>"}` with the matching HTTP
//! status. Internal detail is logged server-side and never written into the
//! response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{CredentialError, TokenError};

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// ApiError
// =============================================================================

/// API error type with HTTP status code mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request (400).
    #[error("bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Unauthorized (401).
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// Conflict (409).
    #[error("conflict: {message}")]
    Conflict {
        /// Error message.
        message: String,
    },

    /// Internal server error (500).
    #[error("internal error: {message}")]
    Internal {
        /// Error message, logged but never returned to the caller.
        message: String,
    },
}

impl ApiError {
    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the reason phrase written into the `error` field.
    pub fn reason(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "Bad Request",
            ApiError::Unauthorized { .. } => "Unauthorized",
            ApiError::Conflict { .. } => "Conflict",
            ApiError::Internal { .. } => "Server Error",
        }
    }

    /// Returns the message written into the response body.
    ///
    /// Internal errors render a fixed opaque message; their detail stays in
    /// the logs.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::BadRequest { message } => message.clone(),
            ApiError::Unauthorized { message } => message.clone(),
            ApiError::Conflict { message } => message.clone(),
            ApiError::Internal { .. } => "An internal error occurred.".to_string(),
        }
    }

    /// Returns `true` if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Internal { .. })
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(error = %self, status = %status, "server error");
        } else {
            tracing::debug!(error = %self, status = %status, "client error");
        }

        let body = ErrorBody {
            error: self.reason().to_string(),
            message: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Error Response Body
// =============================================================================

/// Wire format of an error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Reason phrase, e.g. `"Unauthorized"`.
    pub error: String,
    /// Human-readable diagnostic.
    pub message: String,
}

// =============================================================================
// From Implementations
// =============================================================================

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidKey(message) | TokenError::Signing(message) => {
                ApiError::internal(message)
            }
            // Every verification failure is the same rejection to the caller.
            other => ApiError::unauthorized(other.to_string()),
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidCredentials => {
                ApiError::unauthorized("Invalid username or password")
            }
            CredentialError::DuplicateIdentifier => {
                ApiError::conflict("Identifier is already registered")
            }
            CredentialError::Hashing(message) => ApiError::internal(message),
            CredentialError::Store(e) => ApiError::internal(e.to_string()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
