//! HTTP layer - router and route handlers.
//!
//! Exposes the storage layer as a JSON API under `/api`. Handlers validate
//! first (path ids, then body schemas), delegate to storage, and translate
//! outcomes through [`ApiError`]. No handler touches state outside the
//! storage backend.

mod contacts;
mod error;
mod projects;
mod testimonials;

pub use error::ApiError;

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::storage::Storage;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend selected at startup, fixed for the process lifetime.
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    /// Wrap a storage backend for use as router state.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

/// Build the API router.
///
/// The SPA client is served from a different origin during development, so
/// the API carries a permissive CORS layer.
#[must_use]
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/projects",
            get(projects::list).post(projects::create),
        )
        .route(
            "/api/projects/:id",
            get(projects::get_one)
                .patch(projects::update)
                .delete(projects::delete),
        )
        .route(
            "/api/contact",
            get(contacts::list).post(contacts::create),
        )
        .route(
            "/api/testimonials",
            get(testimonials::list).post(testimonials::create),
        )
        .route(
            "/api/testimonials/:id",
            get(testimonials::get_one)
                .patch(testimonials::update)
                .delete(testimonials::delete),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/health - static liveness signal for uptime monitors.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Server is running!" }))
}

/// Resolve on SIGINT or SIGTERM so in-flight requests can drain.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        tracing::info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
