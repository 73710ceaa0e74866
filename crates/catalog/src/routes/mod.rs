//! HTTP route handlers for the catalog.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Redirect to /catalog
//! GET  /catalog                       - Redirect to /catalog/authors
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (store ping)
//!
//! # Authors
//! GET  /catalog/authors               - Author list
//! GET  /catalog/author/create         - Create form
//! POST /catalog/author/create         - Create action
//! GET  /catalog/author/{id}           - Author detail
//! GET  /catalog/author/{id}/delete    - Delete confirmation
//! POST /catalog/author/{id}/delete    - Delete action (ID from `authorid` field)
//! GET  /catalog/author/{id}/update    - Update form
//! POST /catalog/author/{id}/update    - Update action
//! ```

pub mod authors;
pub mod health;

use std::path::Path;

use axum::{
    Router,
    http::Request,
    middleware::from_fn,
    response::Redirect,
    routing::get,
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::models::AUTHOR_LIST_URL;
use crate::state::AppState;

/// Create the author routes router (mounted under `/catalog`).
pub fn author_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to(AUTHOR_LIST_URL) }))
        .route("/authors", get(authors::list))
        .route(
            "/author/create",
            get(authors::create_form).post(authors::create_submit),
        )
        .route("/author/{id}", get(authors::detail))
        .route(
            "/author/{id}/delete",
            get(authors::delete_form).post(authors::delete_submit),
        )
        .route(
            "/author/{id}/update",
            get(authors::update_form).post(authors::update_submit),
        )
}

/// Create all routes for the catalog.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/catalog", author_routes())
}

/// Build the catalog application with its middleware stack.
///
/// Sentry layers are added by `main` on top of this router.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    routes()
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
