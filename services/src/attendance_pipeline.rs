//! The attendance validation pipeline.
//!
//! A submission passes through a fixed sequence of checks, each terminal on
//! failure: file sanity, coordinate precision and range, session lookup,
//! session expiry, duplicate detection, geofence distance, persist. The
//! observable error precedence follows that order — a duplicate submission
//! to an expired session reports "expired", never "duplicate".
//!
//! Rejections that indicate a fraud signal (unknown session, expired
//! session, duplicate, out of range) are recorded through the audit
//! side-channel before the typed error is returned; client bugs (bad file,
//! bad coordinates) are not audited.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, SqlErr};
use serde_json::json;

use db::models::{attendance_record, attendance_session};
use util::config;

use crate::audit::{AuditLogger, FlagReason};
use crate::geofence::{self, CoordinateError};
use crate::selfie_storage::{ALLOWED_CONTENT_TYPES, SelfieStorage};
use crate::venue_registry::VenueRegistry;

/// An optional photo attached to a submission.
#[derive(Debug, Clone)]
pub struct SelfieUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// One attendance submission as received at the boundary.
///
/// Coordinates stay textual until the precision stage has counted their
/// decimal places; parsing first would erase the distinction between
/// `16.1234567` and `16.12345678`.
#[derive(Debug, Clone)]
pub struct AttendanceSubmission {
    pub session_token: String,
    pub roll_no: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub branch: String,
    pub section: String,
    pub location_lat: String,
    pub location_lon: String,
    pub selfie: Option<SelfieUpload>,
}

/// Closed set of typed rejections, one variant per pipeline stage outcome.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttendanceRejection {
    #[error("Coordinate '{value}' is not a valid number")]
    MalformedCoordinate { value: String },
    #[error(
        "Coordinates may carry at most 7 decimal places (got lat: {lat_decimals}, lon: {lon_decimals})"
    )]
    CoordinatePrecision { lat_decimals: u32, lon_decimals: u32 },
    #[error("Latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lon: f64 },
    #[error("Selfie is {size} bytes; the maximum allowed is {max}")]
    FileSizeTooLarge { size: u64, max: u64 },
    #[error("Selfie content type '{content_type}' is not allowed")]
    FileTypeNotAllowed { content_type: String },
    #[error("Session not found")]
    SessionNotFound { token: String },
    #[error("Session expired at {expired_at}")]
    SessionExpired { expired_at: DateTime<Utc> },
    #[error("Attendance already marked for this session")]
    DuplicateAttendance { first_marked_at: DateTime<Utc> },
    #[error("You are {distance_m:.0} m away from {venue}; the allowed radius is {max_distance_m:.0} m")]
    LocationOutOfRange {
        distance_m: f64,
        max_distance_m: f64,
        venue: String,
        point: (f64, f64),
        center: (f64, f64),
    },
}

impl AttendanceRejection {
    /// Stable machine-readable code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedCoordinate { .. } => "COORDINATE_PARSE_ERROR",
            Self::CoordinatePrecision { .. } => "COORDINATE_PRECISION",
            Self::InvalidCoordinate { .. } => "INVALID_COORDINATES",
            Self::FileSizeTooLarge { .. } => "FILE_TOO_LARGE",
            Self::FileTypeNotAllowed { .. } => "FILE_TYPE_NOT_ALLOWED",
            Self::SessionNotFound { .. } => "SESSION_NOT_FOUND",
            Self::SessionExpired { .. } => "SESSION_EXPIRED",
            Self::DuplicateAttendance { .. } => "DUPLICATE_ATTENDANCE",
            Self::LocationOutOfRange { .. } => "LOCATION_OUT_OF_RANGE",
        }
    }

    /// Structured payload accompanying the human-readable message, where the
    /// variant carries one.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::CoordinatePrecision {
                lat_decimals,
                lon_decimals,
            } => Some(json!({
                "lat_decimals": lat_decimals,
                "lon_decimals": lon_decimals,
                "max_decimals": geofence::MAX_COORDINATE_DECIMALS,
            })),
            Self::FileSizeTooLarge { size, max } => {
                Some(json!({ "size_bytes": size, "max_bytes": max }))
            }
            Self::SessionExpired { expired_at } => {
                Some(json!({ "expired_at": expired_at.to_rfc3339() }))
            }
            Self::DuplicateAttendance { first_marked_at } => {
                Some(json!({ "first_marked_at": first_marked_at.to_rfc3339() }))
            }
            Self::LocationOutOfRange {
                distance_m,
                max_distance_m,
                venue,
                point,
                center,
            } => Some(json!({
                "distance_m": distance_m,
                "max_distance_m": max_distance_m,
                "venue": venue,
                "submitted_lat": point.0,
                "submitted_lon": point.1,
                "venue_lat": center.0,
                "venue_lon": center.1,
            })),
            _ => None,
        }
    }
}

/// Pipeline outcome: a typed rejection, or an infrastructure failure that
/// surfaces as a generic processing error.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Rejected(#[from] AttendanceRejection),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("selfie storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("could not determine geofence distance")]
    DistanceUnavailable,
}

/// Attachment limits applied at the file-sanity stage.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl UploadPolicy {
    pub fn from_config() -> Self {
        Self {
            max_bytes: config::max_selfie_bytes(),
            allowed_types: ALLOWED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub struct AttendancePipeline {
    db: DatabaseConnection,
    audit: AuditLogger,
    registry: VenueRegistry,
    storage: SelfieStorage,
    policy: UploadPolicy,
}

impl AttendancePipeline {
    pub fn new(
        db: DatabaseConnection,
        audit: AuditLogger,
        registry: VenueRegistry,
        storage: SelfieStorage,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            db,
            audit,
            registry,
            storage,
            policy,
        }
    }

    /// Runs one submission through the pipeline exactly once.
    ///
    /// Returns the committed record on success; on failure, the first stage
    /// to reject wins and later stages are never evaluated.
    pub async fn process(
        &self,
        submission: AttendanceSubmission,
        now: DateTime<Utc>,
    ) -> Result<attendance_record::Model, PipelineError> {
        // Stage 1: file sanity. Client bugs, not fraud signals; not audited.
        if let Some(selfie) = &submission.selfie {
            let size = selfie.bytes.len() as u64;
            if size > self.policy.max_bytes {
                return Err(AttendanceRejection::FileSizeTooLarge {
                    size,
                    max: self.policy.max_bytes,
                }
                .into());
            }
            if !self
                .policy
                .allowed_types
                .iter()
                .any(|t| t == &selfie.content_type)
            {
                return Err(AttendanceRejection::FileTypeNotAllowed {
                    content_type: selfie.content_type.clone(),
                }
                .into());
            }
        }

        // Stage 2: coordinate precision and range. Also not audited.
        let (lat, lon) =
            geofence::parse_and_validate(&submission.location_lat, &submission.location_lon)
                .map_err(|e| match e {
                    CoordinateError::Malformed { value } => {
                        AttendanceRejection::MalformedCoordinate { value }
                    }
                    CoordinateError::Precision {
                        lat_decimals,
                        lon_decimals,
                    } => AttendanceRejection::CoordinatePrecision {
                        lat_decimals,
                        lon_decimals,
                    },
                    CoordinateError::OutOfRange { lat, lon } => {
                        AttendanceRejection::InvalidCoordinate { lat, lon }
                    }
                })?;
        let lat = geofence::round_coordinate(lat);
        let lon = geofence::round_coordinate(lon);

        let token = submission.session_token.as_str();
        let roll_no = submission.roll_no.as_str();

        // Stage 3: session lookup.
        let Some(session) = attendance_session::Model::find_by_token(&self.db, token).await? else {
            self.audit
                .record(
                    token,
                    roll_no,
                    FlagReason::SessionNotFound,
                    &format!("No session matches token {token}"),
                )
                .await;
            return Err(AttendanceRejection::SessionNotFound {
                token: token.to_owned(),
            }
            .into());
        };

        // Stage 4: expiry, strictly before the duplicate check.
        if session.is_expired(now) {
            self.audit
                .record(
                    token,
                    roll_no,
                    FlagReason::ExpiredSession,
                    &format!("Session expired at {}", session.expires_at.to_rfc3339()),
                )
                .await;
            return Err(AttendanceRejection::SessionExpired {
                expired_at: session.expires_at,
            }
            .into());
        }

        // Stage 5: duplicate fast path. The unique index on
        // (session_token, roll_no) remains the enforcement of last resort.
        if let Some(existing) = attendance_record::Model::find_duplicate(&self.db, token, roll_no)
            .await?
        {
            self.audit
                .record(
                    token,
                    roll_no,
                    FlagReason::DuplicateAttendance,
                    &format!("First marked at {}", existing.timestamp.to_rfc3339()),
                )
                .await;
            return Err(AttendanceRejection::DuplicateAttendance {
                first_marked_at: existing.timestamp,
            }
            .into());
        }

        // Stage 6: geofence.
        let fence = self.registry.resolve(&self.db, &session).await?;
        let (within, distance) =
            geofence::is_within_geofence(fence.center_lat, fence.center_lon, fence.radius_m, lat, lon);
        if distance < 0.0 {
            // "Could not determine" is an internal failure, not out-of-range.
            return Err(PipelineError::DistanceUnavailable);
        }
        if !within {
            self.audit
                .record(
                    token,
                    roll_no,
                    FlagReason::LocationOutOfRange,
                    &format!(
                        "{distance:.2} m from {} (allowed {:.2} m)",
                        fence.label, fence.radius_m
                    ),
                )
                .await;
            return Err(AttendanceRejection::LocationOutOfRange {
                distance_m: distance,
                max_distance_m: fence.radius_m,
                venue: fence.label,
                point: (lat, lon),
                center: (fence.center_lat, fence.center_lon),
            }
            .into());
        }

        // Stage 7: persist.
        let selfie_path = match &submission.selfie {
            Some(selfie) => Some(self.storage.store(
                &selfie.bytes,
                &selfie.content_type,
                &format!("{roll_no}_{token}"),
            )?),
            None => None,
        };

        let insert = attendance_record::ActiveModel {
            session_token: Set(token.to_owned()),
            roll_no: Set(roll_no.to_owned()),
            name: Set(submission.name.clone()),
            email: Set(submission.email.clone()),
            phone: Set(submission.phone.clone()),
            branch: Set(submission.branch.clone()),
            section: Set(submission.section.clone()),
            location_lat: Set(lat),
            location_lon: Set(lon),
            is_valid_location: Set(true),
            venue_id: Set(session.venue_id),
            selfie_path: Set(selfie_path),
            created_at: Set(now),
            timestamp: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match insert {
            Ok(record) => Ok(record),
            // Lost the duplicate race: the unique index fired after stage 5
            // passed. Reported as a duplicate, exactly as if stage 5 had
            // caught it.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                let first_marked_at =
                    attendance_record::Model::find_duplicate(&self.db, token, roll_no)
                        .await
                        .ok()
                        .flatten()
                        .map(|r| r.timestamp)
                        .unwrap_or(now);
                self.audit
                    .record(
                        token,
                        roll_no,
                        FlagReason::DuplicateAttendance,
                        &format!("First marked at {}", first_marked_at.to_rfc3339()),
                    )
                    .await;
                Err(AttendanceRejection::DuplicateAttendance { first_marked_at }.into())
            }
            Err(e) => Err(PipelineError::Db(e)),
        }
    }
}
