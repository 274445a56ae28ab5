use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202608250001_create_institutions::Migration),
            Box::new(migrations::m202608250002_create_venues::Migration),
            Box::new(migrations::m202608250003_create_qr_sessions::Migration),
            Box::new(migrations::m202608250004_create_attendances::Migration),
            Box::new(migrations::m202608250005_create_flagged_logs::Migration),
            Box::new(migrations::m202608250006_create_admin_users::Migration),
        ]
    }
}
