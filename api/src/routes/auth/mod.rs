use axum::{Router, routing::post};
use util::state::AppState;

pub mod post;

use post::login;

/// Builds the `/auth` route group: admin login only. Students submit
/// attendance anonymously and never authenticate.
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
