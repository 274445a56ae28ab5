use axum::{Router, routing::get};
use util::state::AppState;

pub mod common;
pub mod get;

use get::{list_attendance, list_flagged_logs};

/// Builds the `/admin` route group. The admin guard is applied where this
/// group is mounted.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(list_attendance))
        .route("/flagged-logs", get(list_flagged_logs))
}
