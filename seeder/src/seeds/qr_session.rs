use crate::seed::Seeder;
use db::models::attendance_session::Model;
use sea_orm::{DatabaseConnection, DbErr};
use util::config;

pub struct QrSessionSeeder;

#[async_trait::async_trait]
impl Seeder for QrSessionSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        // One open venueless session so the frontend has something to scan
        // right after seeding.
        Model::create(db, 60, None, &config::frontend_url()).await?;
        Ok(())
    }
}
