use axum::{Router, extract::DefaultBodyLimit, routing::post};
use util::{config, state::AppState};

pub mod common;
pub mod post;

use post::mark_attendance;

/// Builds the `/attendance` route group.
///
/// The body limit sits above the selfie limit so oversized uploads reach the
/// pipeline and come back as a typed `FILE_TOO_LARGE` rejection instead of a
/// framework-level 413.
pub fn attendance_routes() -> Router<AppState> {
    let body_limit = config::max_selfie_bytes() as usize + 1024 * 1024;

    Router::new()
        .route("/mark", post(mark_attendance))
        .layer(DefaultBodyLimit::max(body_limit))
}
