use axum::{
    Json,
    body::Body,
    extract::{Path, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::response::ApiResponse;
use services::geofence::{self, CoordinateError};
use services::selfie_storage::SelfieStorage;
use util::config;

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub lat: String,
    pub lon: String,
}

#[derive(Debug, Serialize, Default)]
pub struct LocationValidationResponse {
    pub within_range: bool,
    pub distance_m: f64,
    pub max_distance_m: f64,
    pub reference: String,
}

/// GET /utils/location/validate?lat=..&lon=..
///
/// Checks a coordinate pair against the institution-wide geofence without
/// touching any session. The frontend uses this to warn students before they
/// fill in the whole form.
///
/// ### Responses
/// - `200 OK` with `within_range` and the computed distance
/// - `400 Bad Request` for malformed, over-precise, or out-of-range input
pub async fn validate_location(
    Query(query): Query<LocationQuery>,
) -> (StatusCode, Json<ApiResponse<LocationValidationResponse>>) {
    let (lat, lon) = match geofence::parse_and_validate(&query.lat, &query.lon) {
        Ok(pair) => pair,
        Err(e) => {
            let code = match e {
                CoordinateError::Malformed { .. } => "COORDINATE_PARSE_ERROR",
                CoordinateError::Precision { .. } => "COORDINATE_PRECISION",
                CoordinateError::OutOfRange { .. } => "INVALID_COORDINATES",
            };
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error_with_code(e.to_string(), code, None)),
            );
        }
    };

    let (within, distance) = geofence::is_within_geofence(
        config::institution_lat(),
        config::institution_lon(),
        config::geofence_radius_m(),
        lat,
        lon,
    );
    if distance < 0.0 {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Could not determine distance")),
        );
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            LocationValidationResponse {
                within_range: within,
                distance_m: distance,
                max_distance_m: config::geofence_radius_m(),
                reference: config::institution_name(),
            },
            "Location checked",
        )),
    )
}

/// GET /utils/selfies/{filename}
///
/// Serves a stored selfie back by the file name recorded on the attendance
/// row. Traversal attempts are rejected by the storage layer and come back
/// as a plain 404.
pub async fn get_selfie(Path(filename): Path<String>) -> Response {
    let storage = SelfieStorage::from_config();

    let Some(path) = storage.resolve(&filename) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Selfie not found")),
        )
            .into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref().to_owned())],
                Body::from(bytes),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, filename, "Failed to read stored selfie");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to read selfie")),
            )
                .into_response()
        }
    }
}
