//! Best-effort audit trail for rejected attendance attempts.
//!
//! The logger owns a database connection separate from the one carrying the
//! main attendance write, so a rollback there can never erase the audit
//! trail. Write failures are logged locally and swallowed: the audit channel
//! must never cause the primary flow to fail or mask its rejection.

use db::models::flagged_log;
use sea_orm::DatabaseConnection;

/// Fixed taxonomy of audited rejection reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagReason {
    SessionNotFound,
    ExpiredSession,
    DuplicateAttendance,
    LocationOutOfRange,
}

impl FlagReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagReason::SessionNotFound => "Session Not Found",
            FlagReason::ExpiredSession => "Expired Session",
            FlagReason::DuplicateAttendance => "Duplicate Attendance",
            FlagReason::LocationOutOfRange => "Location Out of Range",
        }
    }
}

#[derive(Clone)]
pub struct AuditLogger {
    db: DatabaseConnection,
}

impl AuditLogger {
    /// `db` must be a connection dedicated to audit writes.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a flagged attempt and commits immediately.
    ///
    /// Infallible from the caller's perspective: a failed write is reported
    /// via `tracing::warn!` and otherwise ignored.
    pub async fn record(
        &self,
        session_token: &str,
        roll_no: &str,
        reason: FlagReason,
        details: &str,
    ) {
        match flagged_log::Model::create(&self.db, session_token, roll_no, reason.as_str(), details)
            .await
        {
            Ok(entry) => {
                tracing::debug!(
                    id = entry.id,
                    session_token,
                    roll_no,
                    reason = reason.as_str(),
                    "Flagged attendance attempt recorded"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    session_token,
                    roll_no,
                    reason = reason.as_str(),
                    "Failed to write flagged-log entry"
                );
            }
        }
    }
}
