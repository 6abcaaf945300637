// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer-token authentication filter.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{AuthContext, AuthorityResolver, TokenCodec};
use crate::error::ApiError;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer applying the authentication filter to every request.
#[derive(Clone)]
pub struct AuthLayer {
    codec: Arc<TokenCodec>,
    authorities: Arc<dyn AuthorityResolver>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(codec: Arc<TokenCodec>, authorities: Arc<dyn AuthorityResolver>) -> Self {
        Self { codec, authorities }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthFilter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthFilter {
            inner,
            codec: self.codec.clone(),
            authorities: self.authorities.clone(),
        }
    }
}

// =============================================================================
// AuthFilter
// =============================================================================

/// The per-request authentication filter.
///
/// Runs before any authorization decision, once per request:
///
/// - No bearer header: the request continues unauthenticated. Route-level
///   extractors decide whether anonymous access is acceptable.
/// - Bearer token present and valid: the subject's current roles are
///   resolved from the user store and an [`AuthContext`] is attached to the
///   request (unless one is already there - a request is authenticated at
///   most once). The chain continues.
/// - Bearer token present but invalid: the chain is short-circuited with
///   401. A present-but-bad token is an explicit rejection, unlike an absent
///   one.
/// - Role lookup fails for a verified token: 500, kept distinct from the
///   401 path because the token itself was sound.
#[derive(Clone)]
pub struct AuthFilter<S> {
    inner: S,
    codec: Arc<TokenCodec>,
    authorities: Arc<dyn AuthorityResolver>,
}

impl<S> Service<Request<Body>> for AuthFilter<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let codec = self.codec.clone();
        let authorities = self.authorities.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    // Absent token: silent pass-through, no identity attached.
                    return inner.call(req).await;
                }
            };

            let claims = match codec.decode(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::debug!(error = %e, "bearer token rejected");
                    return Ok(ApiError::unauthorized(e.to_string()).into_response());
                }
            };

            // The token carries no roles; authorization data is resolved
            // fresh so revocations apply immediately.
            let roles = match authorities.roles_for(&claims.sub).await {
                Ok(roles) => roles,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        subject = %claims.sub,
                        "role lookup failed for a verified token"
                    );
                    return Ok(ApiError::internal(e.to_string()).into_response());
                }
            };

            if req.extensions().get::<AuthContext>().is_none() {
                req.extensions_mut()
                    .insert(AuthContext::new(claims.sub, roles));
            }

            inner.call(req).await
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer ").map(|s| s.to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credential, MemoryUserStore, StoreError, TokenConfig, UserStore};
    use async_trait::async_trait;
    use axum::http::{HeaderValue, StatusCode};
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use chrono::Utc;
    use std::collections::HashSet;
    use tower::ServiceExt;

    struct FailingResolver;

    #[async_trait]
    impl AuthorityResolver for FailingResolver {
        async fn roles_for(&self, _identifier: &str) -> Result<HashSet<String>, StoreError> {
            Err(StoreError::Backend("store offline".to_string()))
        }
    }

    fn test_codec() -> Arc<TokenCodec> {
        let config = TokenConfig::new(BASE64.encode("0123456789abcdef0123456789abcdef"));
        Arc::new(TokenCodec::new(config).unwrap())
    }

    async fn seeded_store() -> Arc<MemoryUserStore> {
        let store = Arc::new(MemoryUserStore::new());
        store
            .save(Credential {
                identifier: "alice@example.com".to_string(),
                password_hash: "$argon2id$unused".to_string(),
                roles: ["user"].into_iter().map(String::from).collect(),
            })
            .await
            .unwrap();
        store
    }

    /// Probe service reporting whether an identity was attached.
    fn probe() -> impl Service<
        Request<Body>,
        Response = Response,
        Error = std::convert::Infallible,
        Future: Send + 'static,
    > + Clone
           + Send
           + 'static {
        tower::service_fn(|req: Request<Body>| async move {
            let body = match req.extensions().get::<AuthContext>() {
                Some(ctx) => format!("subject={}", ctx.subject()),
                None => "anonymous".to_string(),
            };
            Ok(Response::new(Body::from(body)))
        })
    }

    fn request(auth_header: Option<&str>) -> Request<Body> {
        let mut req = Request::builder()
            .uri("/probe")
            .body(Body::empty())
            .unwrap();
        if let Some(value) = auth_header {
            req.headers_mut()
                .insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        req
    }

    #[test]
    fn test_extract_bearer_token() {
        assert!(extract_bearer_token(&request(None)).is_none());
        assert!(extract_bearer_token(&request(Some("Basic abc"))).is_none());
        assert_eq!(
            extract_bearer_token(&request(Some("Bearer mytoken123"))),
            Some("mytoken123".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_header_passes_through_unauthenticated() {
        let store = seeded_store().await;
        let filter = AuthLayer::new(test_codec(), store).layer(probe());

        let response = filter.oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_token_short_circuits() {
        let store = seeded_store().await;
        let filter = AuthLayer::new(test_codec(), store).layer(probe());

        let response = filter
            .oneshot(request(Some("Bearer garbage")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let codec = test_codec();
        let store = seeded_store().await;
        let token = codec
            .issue("alice@example.com", serde_json::Map::new(), Utc::now())
            .unwrap();

        let filter = AuthLayer::new(codec, store).layer(probe());
        let response = filter
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_server_error() {
        let codec = test_codec();
        let token = codec
            .issue("alice@example.com", serde_json::Map::new(), Utc::now())
            .unwrap();

        let filter = AuthLayer::new(codec, Arc::new(FailingResolver)).layer(probe());
        let response = filter
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_unknown_subject_is_server_error() {
        // A verified token whose subject has disappeared from the store is an
        // infrastructure problem, not an authentication failure.
        let codec = test_codec();
        let store = seeded_store().await;
        let token = codec
            .issue("ghost@example.com", serde_json::Map::new(), Utc::now())
            .unwrap();

        let filter = AuthLayer::new(codec, store).layer(probe());
        let response = filter
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_existing_identity_is_not_overwritten() {
        let codec = test_codec();
        let store = seeded_store().await;
        let token = codec
            .issue("alice@example.com", serde_json::Map::new(), Utc::now())
            .unwrap();

        let preset = AuthContext::new("preset@example.com", HashSet::new());
        let mut req = request(Some(&format!("Bearer {token}")));
        req.extensions_mut().insert(preset);

        let observer = tower::service_fn(|req: Request<Body>| async move {
            let subject = req
                .extensions()
                .get::<AuthContext>()
                .map(|ctx| ctx.subject().to_string())
                .unwrap_or_default();
            Ok::<_, std::convert::Infallible>(Response::new(Body::from(subject)))
        });

        let filter = AuthLayer::new(codec, store).layer(observer);
        let response = filter.oneshot(req).await.unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"preset@example.com");
    }
}
