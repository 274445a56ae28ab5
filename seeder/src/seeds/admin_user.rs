use crate::seed::Seeder;
use db::models::admin_user::Model;
use sea_orm::{DatabaseConnection, DbErr};

pub struct AdminUserSeeder;

#[async_trait::async_trait]
impl Seeder for AdminUserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        if Model::verify_credentials(db, "admin", "admin123")
            .await?
            .is_none()
        {
            let _ = Model::create(db, "admin", "admin123").await;
        }
        Ok(())
    }
}
