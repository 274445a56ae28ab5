use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    admin_user::AdminUserSeeder, attendance::AttendanceSeeder, institution::InstitutionSeeder,
    qr_session::QrSessionSeeder, venue::VenueSeeder,
};
use sea_orm_migration::MigratorTrait;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let db = db::connect().await;

    migration::Migrator::up(&db, None)
        .await
        .expect("Migration failed");

    for (seeder, name) in [
        (
            Box::new(InstitutionSeeder) as Box<dyn Seeder + Send + Sync>,
            "Institution",
        ),
        (Box::new(VenueSeeder), "Venue"),
        (Box::new(AdminUserSeeder), "AdminUser"),
        (Box::new(QrSessionSeeder), "QrSession"),
        (Box::new(AttendanceSeeder), "Attendance"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
