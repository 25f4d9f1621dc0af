//! Router assembly: HTTP endpoints, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::protocol::ErrorOut;
use crate::state::AppState;

pub mod listening;
pub mod reading;
pub mod session;
pub mod writing;

/// Build the application router with:
/// - REST API under `/api/...` (one attempt/second-variant/assessment trio
///   per exam section, plus session tracking and subscriptions)
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(session::root))
        .route("/api/health", get(session::health))
        .route("/api/track-session", post(session::track_session))
        .route("/api/subscribe", post(session::subscribe))
        // Writing
        .route("/api/writing-attempt", post(writing::writing_attempt))
        .route("/api/writing-task2", post(writing::writing_task2))
        .route("/api/writing-assessment", post(writing::writing_assessment))
        // Reading
        .route("/api/reading-attempt", post(reading::reading_attempt))
        .route("/api/reading-text2", post(reading::reading_text2))
        .route("/api/reading-assessment", post(reading::reading_assessment))
        // Listening
        .route("/api/listening-attempt", post(listening::listening_attempt))
        .route("/api/listening-part2", post(listening::listening_part2))
        .route("/api/listening-assessment", post(listening::listening_assessment))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// 400 with the standard error body. Raised before any upstream work.
pub(crate) fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorOut { success: false, message: message.to_string(), error: None }),
    )
        .into_response()
}

/// 500 with a summarized message and optional upstream detail.
pub(crate) fn server_error(message: &str, detail: Option<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorOut { success: false, message: message.to_string(), error: detail }),
    )
        .into_response()
}

/// Presence check for required body fields: Some only if non-blank.
pub(crate) fn provided(field: &Option<String>) -> Option<&String> {
    field.as_ref().filter(|s| !s.trim().is_empty())
}
