//! REST API handlers for the read API

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::query::{ListParams, QueryError};

use super::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub articles: Option<u64>,
}

/// Body for unexpected server-side failures
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        match self {
            // caller error; not logged as a server failure
            Self::Validation(errors) => (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response(),
            Self::Storage(e) => {
                tracing::error!(error = %e, "Article query failed");
                server_error()
            }
        }
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            message: String::from("Server Error"),
        }),
    )
        .into_response()
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/v1/articles", get(list_articles))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let repo = state.repo.clone();
    let count = tokio::task::spawn_blocking(move || repo.count()).await;

    let uptime_secs = state.start_time.elapsed().as_secs();
    let version = env!("CARGO_PKG_VERSION");

    match count {
        Ok(Ok(articles)) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version,
                uptime_secs,
                articles: Some(articles),
            }),
        ),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Health check could not reach the store");
            degraded(version, uptime_secs)
        }
        Err(e) => {
            tracing::error!(error = %e, "Health check task failed");
            degraded(version, uptime_secs)
        }
    }
}

fn degraded(version: &'static str, uptime_secs: u64) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(HealthResponse {
            status: "degraded",
            version,
            uptime_secs,
            articles: None,
        }),
    )
}

async fn list_articles(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Response {
    let params = ListParams::from_query_string(raw.as_deref().unwrap_or_default());
    let service = state.query.clone();

    match tokio::task::spawn_blocking(move || service.list(params)).await {
        Ok(Ok(page)) => (StatusCode::OK, Json(page)).into_response(),
        Ok(Err(e)) => e.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Article query task failed");
            server_error()
        }
    }
}
