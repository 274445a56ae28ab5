use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

use get::list_venues;

/// Builds the `/venues` route group: a public listing used by the frontend
/// when an admin picks the venue for a new session.
pub fn venue_routes() -> Router<AppState> {
    Router::new().route("/", get(list_venues))
}
