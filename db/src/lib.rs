pub mod models;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection};
use std::path::Path;
use util::config;

/// Connects to the database named by `DATABASE_PATH`.
///
/// Accepts either a full DSN or a bare SQLite file path.
pub async fn connect() -> DatabaseConnection {
    connect_to(&config::database_path()).await
}

/// Connects to the given path or DSN. Used by `connect()` and by the audit
/// side-channel, which needs its own connection to the same database.
pub async fn connect_to(path_or_url: &str) -> DatabaseConnection {
    let url = if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
    {
        path_or_url.to_owned()
    } else {
        // Ensure parent directory exists (SQLite won't create intermediate dirs).
        if let Some(parent) = Path::new(path_or_url).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path_or_url}?mode=rwc")
    };

    Database::connect(&url)
        .await
        .expect("Failed to connect to database")
}
