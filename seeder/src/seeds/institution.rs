use crate::seed::Seeder;
use db::models::institution::Model;
use sea_orm::{DatabaseConnection, DbErr};

pub struct InstitutionSeeder;

#[async_trait::async_trait]
impl Seeder for InstitutionSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        if Model::find_by_name(db, "KL University").await?.is_none() {
            Model::create(db, "KL University", "Vijayawada").await?;
        }
        Ok(())
    }
}
