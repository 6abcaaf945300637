// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request authenticated identity.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

/// The authenticated identity attached to a request.
///
/// Constructed by the authentication filter from a verified token (roles
/// freshly resolved from the user store) or by the credential authenticator
/// at login. It lives in the request extensions for exactly one request;
/// nothing process-wide ever holds one.
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    /// Authenticated identifier (the token subject).
    pub subject: String,
    /// Roles as currently granted by the user store.
    pub roles: HashSet<String>,
    /// Request ID for tracing.
    pub request_id: Uuid,
}

impl AuthContext {
    /// Creates a context for `subject` with the given roles.
    pub fn new(subject: impl Into<String>, roles: HashSet<String>) -> Self {
        Self {
            subject: subject.into(),
            roles,
            request_id: Uuid::now_v7(),
        }
    }

    /// Returns the authenticated identifier.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns `true` if the identity holds the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns `true` if the identity holds any of the given roles.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        let roles: HashSet<String> = ["operator", "viewer"]
            .into_iter()
            .map(String::from)
            .collect();
        let ctx = AuthContext::new("alice@example.com", roles);

        assert_eq!(ctx.subject(), "alice@example.com");
        assert!(ctx.has_role("operator"));
        assert!(!ctx.has_role("admin"));
        assert!(ctx.has_any_role(&["admin", "viewer"]));
        assert!(!ctx.has_any_role(&["admin", "superadmin"]));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = AuthContext::new("alice", HashSet::new());
        let b = AuthContext::new("alice", HashSet::new());
        assert_ne!(a.request_id, b.request_id);
    }
}
