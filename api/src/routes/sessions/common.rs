use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateSessionReq {
    pub duration_minutes: i64,
    pub venue_id: Option<i64>,
}

#[derive(Debug, Serialize, Default)]
pub struct SessionResponse {
    pub session_token: String,
    pub qr_payload: String,
    pub venue_id: Option<i64>,
    pub created_at: String,
    pub expires_at: String,
    pub expired: bool,
    pub remaining_seconds: i64,
}

impl From<db::models::attendance_session::Model> for SessionResponse {
    fn from(m: db::models::attendance_session::Model) -> Self {
        let now = Utc::now();
        Self {
            session_token: m.session_token.clone(),
            qr_payload: m.qr_payload.clone(),
            venue_id: m.venue_id,
            created_at: m.created_at.to_rfc3339(),
            expires_at: m.expires_at.to_rfc3339(),
            expired: m.is_expired(now),
            remaining_seconds: m.remaining_seconds(now),
        }
    }
}
