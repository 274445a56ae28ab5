use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// In-memory SQLite with all migrations applied. One connection only;
/// suitable for tests that never exercise the audit side-channel.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// File-backed SQLite in a temp dir, returned as two independent connections
/// to the same database. The audit logger must write on a connection separate
/// from the one carrying the main transaction, which an in-memory database
/// cannot provide.
pub async fn setup_paired_test_db() -> (DatabaseConnection, DatabaseConnection, tempfile::TempDir)
{
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}/test.db?mode=rwc", dir.path().display());

    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to test db");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let audit_db = Database::connect(&url)
        .await
        .expect("Failed to open audit connection");

    (db, audit_db, dir)
}
