use axum::{Json, extract::State, http::StatusCode};
use sea_orm::DbErr;

use crate::response::ApiResponse;
use util::{config, state::AppState};

use super::common::{CreateSessionReq, SessionResponse};
use db::models::attendance_session;

/// POST /sessions
///
/// Issue a new QR session (admin-only). The previous session is not revoked;
/// it simply keeps running down its own clock.
///
/// ### Request Body
/// ```json
/// {
///   "duration_minutes": 10,
///   "venue_id": 3
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the session token and QR payload
/// - `400 Bad Request` when `duration_minutes` is outside `(0, 1440]`
/// - `404 Not Found` when `venue_id` does not exist
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionReq>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    match attendance_session::Model::create(
        state.db(),
        body.duration_minutes,
        body.venue_id,
        &config::frontend_url(),
    )
    .await
    {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SessionResponse::from(row),
                "Session created",
            )),
        ),
        Err(DbErr::Custom(m)) => (StatusCode::BAD_REQUEST, Json(ApiResponse::error(m))),
        Err(DbErr::RecordNotFound(m)) => (StatusCode::NOT_FOUND, Json(ApiResponse::error(m))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to create session: {e}"))),
        ),
    }
}
