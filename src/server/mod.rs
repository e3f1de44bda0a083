//! Read API server
//!
//! An axum application exposing the stored articles:
//!
//! - `GET /api/v1/articles` - filtered, sorted, paginated article list
//! - `GET /api/health` - liveness plus stored article count
//!
//! # Example
//!
//! ```no_run
//! use newsroom::server::ApiServer;
//! use newsroom::storage::create_memory_repository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = newsroom::config::Config::default().server;
//! let server = ApiServer::new(config, create_memory_repository());
//! server.start_with_shutdown(async {
//!     let _ = tokio::signal::ctrl_c().await;
//! }).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;

use std::time::Instant;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::query::QueryService;
use crate::storage::SharedArticleRepository;

pub use api::create_router;

// ============================================================================
// App State
// ============================================================================

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub repo: SharedArticleRepository,

    pub query: QueryService,

    pub start_time: Instant,
}

impl AppState {
    pub fn new(repo: SharedArticleRepository) -> Self {
        Self {
            query: QueryService::new(repo.clone()),
            repo,
            start_time: Instant::now(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

// ============================================================================
// API Server
// ============================================================================

pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ServerConfig, repo: SharedArticleRepository) -> Self {
        Self {
            config,
            state: AppState::new(repo),
        }
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Router with the configured middleware layers
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Serve until `shutdown_signal` resolves, then drain in-flight requests
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(ServerError::Bind)?;

        tracing::info!(%addr, "Read API listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("Read API shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::create_memory_repository;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_count() {
        let server = ApiServer::new(Config::default().server, create_memory_repository());

        let response = server
            .build_router()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["articles"], 0);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let server = ApiServer::new(Config::default().server, create_memory_repository());

        let response = server
            .build_router()
            .oneshot(Request::get("/api/v2/articles").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
