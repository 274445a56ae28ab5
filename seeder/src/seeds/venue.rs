use crate::seed::Seeder;
use db::models::{institution, venue};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};

pub struct VenueSeeder;

#[async_trait::async_trait]
impl Seeder for VenueSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        if venue::Entity::find().count(db).await? > 0 {
            return Ok(());
        }

        let inst = institution::Model::find_by_name(db, "KL University")
            .await?
            .ok_or_else(|| DbErr::Custom("Institution must be seeded first".into()))?;

        for (name, lat, lon, radius) in [
            ("Main Gate", 16.466167, 80.674499, 50.0),
            ("IT Hall", 17.4446, 78.3498, 200.0),
            ("Auditorium", 16.465800, 80.675100, 120.0),
        ] {
            venue::Model::create(db, inst.id, name, lat, lon, radius).await?;
        }
        Ok(())
    }
}
