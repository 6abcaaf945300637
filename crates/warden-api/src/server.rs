// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::AuthLayer;
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// Assembles the router with its middleware stack and serves it.
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Creates a new API server over the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Creates the router with all routes and middleware.
    ///
    /// The authentication filter wraps every route; which routes additionally
    /// require an identity is decided by their extractors.
    pub fn router(&self) -> Router {
        let auth = AuthLayer::new(self.state.codec.clone(), self.state.authorities.clone());

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.state.config.request_timeout))
            .layer(cors_layer())
            .layer(auth);

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/v1/auth/register", post(handlers::register))
            .route("/api/v1/auth/login", post(handlers::login))
            .route("/api/v1/auth/me", get(handlers::current_user))
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until the listener fails.
    pub async fn run(self) -> ApiResult<()> {
        self.serve(std::future::pending()).await
    }

    /// Runs the server until `shutdown_signal` resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        self.serve(shutdown_signal).await
    }

    async fn serve(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.addr();
        let router = self.router();

        info!("starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("failed to bind {addr}: {e}")))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::internal(format!("server error: {e}")))?;

        info!("API server shutdown complete");
        Ok(())
    }

    /// Returns the configured listen address.
    pub fn addr(&self) -> SocketAddr {
        self.state.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// CORS layer for browser clients: token submission needs the Authorization
/// header allowed through.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

// =============================================================================
// Tests
// =============================================================================
