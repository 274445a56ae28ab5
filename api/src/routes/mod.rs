//! HTTP route entry point for `/api/...`.
//!
//! This module defines all HTTP entry points under the `/api` namespace.
//! Routes are organized by domain, each protected via appropriate access
//! control middleware.
//!
//! Route groups include:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Admin login (public)
//! - `/sessions` → QR session issuing (admin-only) and status lookup (public)
//! - `/attendance` → Attendance submission (public, token-gated)
//! - `/venues` → Venue listing (public)
//! - `/utils` → Location pre-checks and selfie retrieval (public)
//! - `/admin` → Attendance and flagged-log reports (admin-only)

use crate::auth::guards::allow_admin;
use crate::routes::{
    admin::admin_routes, attendance::attendance_routes, auth::auth_routes, health::health_routes,
    sessions::session_routes, utils::utils_routes, venues::venue_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod admin;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod health;
pub mod sessions;
pub mod utils;
pub mod venues;

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router has `AppState` as its state type and mounts all core
/// API routes under their respective base paths.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/sessions", session_routes())
        .nest("/attendance", attendance_routes())
        .nest("/venues", venue_routes())
        .nest("/utils", utils_routes())
        .nest("/admin", admin_routes().route_layer(from_fn(allow_admin)))
        .with_state(app_state)
}
