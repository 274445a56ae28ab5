use axum::{Json, extract::State, http::StatusCode};
use sea_orm::EntityTrait;
use serde::Serialize;

use crate::response::ApiResponse;
use db::models::{institution, venue};
use util::state::AppState;

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    pub id: i64,
    pub name: String,
    pub institution: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

/// GET /venues
///
/// Lists all venues with their geofence and owning institution.
pub async fn list_venues(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<VenueResponse>>>) {
    match venue::Entity::find()
        .find_also_related(institution::Entity)
        .all(state.db())
        .await
    {
        Ok(rows) => {
            let venues = rows
                .into_iter()
                .map(|(v, inst)| VenueResponse {
                    id: v.id,
                    name: v.name,
                    institution: inst.map(|i| i.name).unwrap_or_default(),
                    latitude: v.latitude,
                    longitude: v.longitude,
                    radius_meters: v.radius_meters,
                })
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(venues, "Venues retrieved")),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
