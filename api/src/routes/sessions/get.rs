use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::response::ApiResponse;
use util::state::AppState;

use super::common::SessionResponse;
use db::models::attendance_session;

/// GET /sessions/{token}
///
/// Public session status lookup. The frontend page behind a scanned QR code
/// calls this before rendering the submission form, so an expired session is
/// still a `200` here; only an unknown token is a `404`.
pub async fn get_session(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    match attendance_session::Model::find_by_token(state.db(), &token).await {
        Ok(Some(session)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SessionResponse::from(session),
                "Session found",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error_with_code(
                "Session not found",
                "SESSION_NOT_FOUND",
                None,
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
