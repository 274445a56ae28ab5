use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

use crate::auth::guards::allow_admin;

pub mod common;
pub mod get;
pub mod post;

use get::get_session;
use post::create_session;

/// Builds the `/sessions` route group.
///
/// Issuing a session is admin-only; looking one up by token is public so the
/// frontend page a QR code opens can show expiry state before submitting.
pub fn session_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_session))
        .route_layer(from_fn(allow_admin));

    Router::new()
        .route("/{token}", get(get_session))
        .merge(protected)
}
