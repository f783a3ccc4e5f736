use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, Request},
    routing::{get, post},
    Router,
};
use eagle_core::config::AppConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index_banner))
        .route("/health", get(handlers::health_check))
        .route("/api/query", post(handlers::handle_query))
        .route("/api/run-inference", post(handlers::handle_run_inference))
        .with_state(state)
}

/// The full server: API routes, static files, CORS, and request tracing
pub fn create_app(state: Arc<AppState>, config: &AppConfig) -> anyhow::Result<Router> {
    let origin = match &config.cors_origin.value {
        Some(origin) => AllowOrigin::exact(origin.parse::<HeaderValue>()?),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        tracing::info_span!(
            "request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            path = %request.uri().path(),
        )
    });

    Ok(create_router(state)
        .fallback_service(ServeDir::new(&config.static_dir.value))
        .layer(cors)
        .layer(trace))
}
