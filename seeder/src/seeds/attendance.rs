use crate::seed::Seeder;
use chrono::Utc;
use db::models::{attendance_record, attendance_session};
use fake::{Fake, faker::name::en::Name};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use services::geofence;

pub struct AttendanceSeeder;

/// Nudges a coordinate by up to ~10 m, rounded to the 7-decimal precision
/// every stored coordinate uses.
fn jitter(v: f64) -> f64 {
    geofence::round_coordinate(v + (fastrand::f64() - 0.5) * 0.0002)
}

#[async_trait::async_trait]
impl Seeder for AttendanceSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let session = attendance_session::Entity::find()
            .order_by_desc(attendance_session::Column::Id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::Custom("QR session must be seeded first".into()))?;

        // A handful of on-campus submissions so the admin report is not empty.
        let branches = ["CSE", "ECE", "MECH"];
        for i in 0..12u32 {
            let name: String = Name().fake();
            let roll_no = format!("208W1A{:04}", 1000 + i);

            let now = Utc::now();
            attendance_record::ActiveModel {
                session_token: Set(session.session_token.clone()),
                roll_no: Set(roll_no),
                name: Set(name),
                email: Set(None),
                phone: Set(None),
                branch: Set(branches[(i as usize) % branches.len()].to_owned()),
                section: Set(if i % 2 == 0 { "A" } else { "B" }.to_owned()),
                location_lat: Set(jitter(16.466167)),
                location_lon: Set(jitter(80.674499)),
                is_valid_location: Set(true),
                venue_id: Set(session.venue_id),
                selfie_path: Set(None),
                created_at: Set(now),
                timestamp: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }
}
