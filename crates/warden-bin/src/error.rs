// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Binary-level error type.

use thiserror::Error;
use warden_api::{ApiError, ConfigError};

/// Result type alias for binary operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors surfaced by the binary commands.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The API server failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
