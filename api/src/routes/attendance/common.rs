use axum::http::StatusCode;
use serde::Serialize;
use services::attendance_pipeline::AttendanceRejection;

#[derive(Debug, Serialize, Default)]
pub struct AttendanceResponse {
    pub id: i64,
    pub session_token: String,
    pub roll_no: String,
    pub name: String,
    pub branch: String,
    pub section: String,
    pub location_lat: f64,
    pub location_lon: f64,
    pub selfie_path: Option<String>,
    pub marked_at: String,
}

impl From<db::models::attendance_record::Model> for AttendanceResponse {
    fn from(m: db::models::attendance_record::Model) -> Self {
        Self {
            id: m.id,
            session_token: m.session_token,
            roll_no: m.roll_no,
            name: m.name,
            branch: m.branch,
            section: m.section,
            location_lat: m.location_lat,
            location_lon: m.location_lon,
            selfie_path: m.selfie_path,
            marked_at: m.timestamp.to_rfc3339(),
        }
    }
}

/// Maps a pipeline rejection onto the HTTP status it is reported with.
pub fn rejection_status(rejection: &AttendanceRejection) -> StatusCode {
    match rejection {
        AttendanceRejection::MalformedCoordinate { .. }
        | AttendanceRejection::CoordinatePrecision { .. }
        | AttendanceRejection::InvalidCoordinate { .. }
        | AttendanceRejection::FileSizeTooLarge { .. }
        | AttendanceRejection::FileTypeNotAllowed { .. }
        | AttendanceRejection::SessionExpired { .. } => StatusCode::BAD_REQUEST,
        AttendanceRejection::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        AttendanceRejection::DuplicateAttendance { .. } => StatusCode::CONFLICT,
        AttendanceRejection::LocationOutOfRange { .. } => StatusCode::FORBIDDEN,
    }
}
