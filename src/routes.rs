// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{self, quiz, scores},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Every route is served both bare and under `/api`, so the app works
///   directly and behind a reverse proxy that keeps the prefix.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (stores and config).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    let quiz_routes = Router::new()
        .route("/questions", get(quiz::list_questions))
        .route("/submit", post(quiz::submit_answers))
        .route("/scores", get(scores::list_scores))
        .route("/scores/export", get(scores::export_scores))
        .route("/health", get(handlers::health_check));

    Router::new()
        .merge(quiz_routes.clone())
        .nest("/api", quiz_routes)
        .fallback(handlers::not_found)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// `*` allows any origin; otherwise a comma separated allow-list.
/// Unparseable entries are dropped, never widened to `*`.
fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origin
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
