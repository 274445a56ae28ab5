use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use db::models::admin_user;
use util::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
    pub token: String,
    pub expires_at: String,
}

/// POST /auth/login
///
/// Authenticate an admin and issue a JWT.
///
/// ### Request Body
/// ```json
/// {
///   "username": "admin",
///   "password": "strongpassword"
/// }
/// ```
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": 1,
///     "username": "admin",
///     "token": "jwt_token_here",
///     "expires_at": "2026-08-25T11:00:00Z"
///   },
///   "message": "Login successful"
/// }
/// ```
///
/// - `401 Unauthorized` (unknown username or wrong password)
/// ```json
/// {
///   "success": false,
///   "message": "Invalid username or password"
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<LoginResponse>::error(error_message)),
        );
    }

    match admin_user::Model::verify_credentials(state.db(), &req.username, &req.password).await {
        Ok(Some(user)) => {
            let (token, expires_at) = generate_jwt(user.id, true);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    LoginResponse {
                        id: user.id,
                        username: user.username,
                        token,
                        expires_at,
                    },
                    "Login successful",
                )),
            )
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<LoginResponse>::error(
                "Invalid username or password",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<LoginResponse>::error(format!(
                "Database error: {e}"
            ))),
        ),
    }
}
