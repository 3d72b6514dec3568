//! # cms-api — Axum API Service
//!
//! HTTP surface for Esquema CMS, built on Axum/Tower/Tokio. Editors read a
//! schema together with its stored document, submit edited documents, and
//! upload images. Every submitted document passes through the compiled
//! schema validator from `cms-schema` before it is written.
//!
//! ## Routes
//!
//! - `GET /api/cms` — available `{type, name}` schemas
//! - `GET|PUT /api/cms/{type}/{name}` — page document or blog index
//! - `POST /api/cms/reload/{type}/{name}` — drop a compiled schema
//! - `GET|PUT /api/cms/blog/{name}` — entry listing / index write
//! - `GET|POST|PUT /api/cms/blog/{name}/{slug}` — blog entries
//! - `POST /api/upload` — image upload
//! - `/health/*` — liveness and readiness probes
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → CorsLayer → DefaultBodyLimit
//!
//! ## Crate Policy
//!
//! - No validation logic in handlers; they delegate to `cms-schema`.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod store;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    let cors = cors_layer(&state.config.cors_origins);

    let api = Router::new()
        .merge(routes::content::router())
        .merge(routes::blog::router())
        .merge(routes::upload::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins: Vec<_> = origins.iter().filter_map(|s| s.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
