// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API request handlers.

mod auth;
mod health;

pub use auth::{current_user, login, register, CurrentUserResponse, LoginRequest, RegisterRequest};
pub use health::health;
