// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Warden Integration Tests
//!
//! End-to-end tests for the Warden authentication service, driving the
//! assembled router request by request.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p warden-tests
//!
//! # Run a specific test
//! cargo test -p warden-tests test_auth_login_returns_token
//! ```

pub mod common;
