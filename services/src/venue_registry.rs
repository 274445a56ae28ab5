//! Per-request geofence resolution.
//!
//! A session bound to a venue uses that venue's center and radius; a session
//! without one falls back to the institution-wide defaults injected at
//! construction time. Resolution is never cached across requests because
//! venue data can change between sessions.

use db::models::{attendance_session, venue};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use util::config;

/// Institution-wide fallback geofence, injected explicitly instead of being
/// read from process-global mutable state.
#[derive(Debug, Clone)]
pub struct GeofenceDefaults {
    pub lat: f64,
    pub lon: f64,
    pub radius_m: f64,
    pub label: String,
}

impl GeofenceDefaults {
    pub fn from_config() -> Self {
        Self {
            lat: config::institution_lat(),
            lon: config::institution_lon(),
            radius_m: config::geofence_radius_m(),
            label: config::institution_name(),
        }
    }
}

/// The geofence a submission is checked against, with the label used in
/// audit messages and user-facing rejections.
#[derive(Debug, Clone)]
pub struct ResolvedGeofence {
    pub center_lat: f64,
    pub center_lon: f64,
    pub radius_m: f64,
    pub label: String,
    pub venue_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct VenueRegistry {
    defaults: GeofenceDefaults,
}

impl VenueRegistry {
    pub fn new(defaults: GeofenceDefaults) -> Self {
        Self { defaults }
    }

    /// Resolves the geofence for a session: the bound venue when present,
    /// the institution defaults otherwise.
    pub async fn resolve(
        &self,
        db: &DatabaseConnection,
        session: &attendance_session::Model,
    ) -> Result<ResolvedGeofence, DbErr> {
        if let Some(venue_id) = session.venue_id {
            match venue::Entity::find_by_id(venue_id).one(db).await? {
                Some(v) => {
                    return Ok(ResolvedGeofence {
                        center_lat: v.latitude,
                        center_lon: v.longitude,
                        radius_m: v.radius_meters,
                        label: v.name,
                        venue_id: Some(v.id),
                    });
                }
                None => {
                    // FK should prevent this; fall back rather than reject.
                    tracing::warn!(
                        venue_id,
                        session_token = %session.session_token,
                        "Session references a missing venue; using institution defaults"
                    );
                }
            }
        }

        Ok(ResolvedGeofence {
            center_lat: self.defaults.lat,
            center_lon: self.defaults.lon,
            radius_m: self.defaults.radius_m,
            label: self.defaults.label.clone(),
            venue_id: None,
        })
    }
}
