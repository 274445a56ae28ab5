use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

use get::{get_selfie, validate_location};

/// Builds the `/utils` route group: a location pre-check the frontend can
/// call before submitting, and selfie retrieval by stored file name.
pub fn utils_routes() -> Router<AppState> {
    Router::new()
        .route("/location/validate", get(validate_location))
        .route("/selfies/{filename}", get(get_selfie))
}
