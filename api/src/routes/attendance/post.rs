use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use chrono::Utc;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use util::state::AppState;

use super::common::{AttendanceResponse, rejection_status};
use services::attendance_pipeline::{
    AttendancePipeline, AttendanceSubmission, PipelineError, SelfieUpload, UploadPolicy,
};
use services::audit::AuditLogger;
use services::selfie_storage::SelfieStorage;
use services::venue_registry::{GeofenceDefaults, VenueRegistry};

/// Collected multipart form fields, all optional until presence is checked.
#[derive(Debug, Default)]
struct RawForm {
    session_token: Option<String>,
    roll_no: Option<String>,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    branch: Option<String>,
    section: Option<String>,
    location_lat: Option<String>,
    location_lon: Option<String>,
    selfie: Option<SelfieUpload>,
}

#[derive(Debug, Validate)]
struct MarkAttendanceFields {
    #[validate(length(min = 1, message = "roll_no must not be empty"))]
    roll_no: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: String,
    #[validate(email(message = "Invalid email format"))]
    email: Option<String>,
    #[validate(length(min = 1, message = "branch must not be empty"))]
    branch: String,
    #[validate(length(min = 1, message = "section must not be empty"))]
    section: String,
}

type MarkResult = (StatusCode, Json<ApiResponse<AttendanceResponse>>);

async fn read_form(multipart: &mut Multipart) -> Result<RawForm, MarkResult> {
    let mut form = RawForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Malformed multipart body: {e}"))),
        )
    })? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "selfie" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let bytes = field.bytes().await.map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format!("Failed to read selfie: {e}"))),
                )
            })?;
            // An empty file part means "no selfie"; browsers send one for a
            // left-blank file input.
            if !bytes.is_empty() {
                form.selfie = Some(SelfieUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            continue;
        }

        let value = field.text().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!(
                    "Failed to read field '{name}': {e}"
                ))),
            )
        })?;

        match name.as_str() {
            "session_token" => form.session_token = Some(value),
            "roll_no" => form.roll_no = Some(value),
            "name" => form.name = Some(value),
            "email" => form.email = Some(value).filter(|v| !v.is_empty()),
            "phone" => form.phone = Some(value).filter(|v| !v.is_empty()),
            "branch" => form.branch = Some(value),
            "section" => form.section = Some(value),
            "location_lat" => form.location_lat = Some(value),
            "location_lon" => form.location_lon = Some(value),
            _ => {}
        }
    }

    Ok(form)
}

fn missing_fields(form: &RawForm) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if form.session_token.is_none() {
        missing.push("session_token");
    }
    if form.roll_no.is_none() {
        missing.push("roll_no");
    }
    if form.name.is_none() {
        missing.push("name");
    }
    if form.branch.is_none() {
        missing.push("branch");
    }
    if form.section.is_none() {
        missing.push("section");
    }
    if form.location_lat.is_none() {
        missing.push("location_lat");
    }
    if form.location_lon.is_none() {
        missing.push("location_lon");
    }
    missing
}

/// POST /attendance/mark
///
/// Submit attendance for a QR session. Multipart form fields:
/// `session_token`, `roll_no`, `name`, `branch`, `section`, `location_lat`,
/// `location_lon` (required); `email`, `phone`, `selfie` (optional).
///
/// ### Responses
/// - `201 Created` with the stored record
/// - `400 Bad Request` for bad coordinates, bad files, or an expired session
/// - `403 Forbidden` when the submitted location is outside the geofence
/// - `404 Not Found` for an unknown session token
/// - `409 Conflict` when this roll number already marked this session
/// - `422 Unprocessable Entity` when required fields are missing
///
/// Rejection bodies carry a stable `error` code, e.g.:
/// ```json
/// {
///   "success": false,
///   "data": {},
///   "message": "Attendance already marked for this session",
///   "error": "DUPLICATE_ATTENDANCE",
///   "details": { "first_marked_at": "2026-08-25T09:00:00+00:00" }
/// }
/// ```
pub async fn mark_attendance(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> MarkResult {
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let missing = missing_fields(&form);
    if !missing.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(format!(
                "Missing required fields: {}",
                missing.join(", ")
            ))),
        );
    }

    let fields = MarkAttendanceFields {
        roll_no: form.roll_no.clone().unwrap_or_default(),
        name: form.name.clone().unwrap_or_default(),
        email: form.email.clone(),
        branch: form.branch.clone().unwrap_or_default(),
        section: form.section.clone().unwrap_or_default(),
    };
    if let Err(validation_errors) = fields.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let submission = AttendanceSubmission {
        session_token: form.session_token.unwrap_or_default(),
        roll_no: fields.roll_no,
        name: fields.name,
        email: fields.email,
        phone: form.phone,
        branch: fields.branch,
        section: fields.section,
        location_lat: form.location_lat.unwrap_or_default(),
        location_lon: form.location_lon.unwrap_or_default(),
        selfie: form.selfie,
    };

    let pipeline = AttendancePipeline::new(
        state.db_clone(),
        AuditLogger::new(state.audit_db_clone()),
        VenueRegistry::new(GeofenceDefaults::from_config()),
        SelfieStorage::from_config(),
        UploadPolicy::from_config(),
    );

    match pipeline.process(submission, Utc::now()).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AttendanceResponse::from(record),
                "Attendance marked",
            )),
        ),
        Err(PipelineError::Rejected(rejection)) => (
            rejection_status(&rejection),
            Json(ApiResponse::error_with_code(
                rejection.to_string(),
                rejection.code(),
                rejection.details(),
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Attendance pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to process attendance")),
            )
        }
    }
}
