//! Application state container shared across Axum route handlers and services.
//!
//! Holds the primary database connection and a second, dedicated connection
//! used exclusively for audit writes. The two are kept separate so that a
//! rollback on the primary connection can never undo a flagged-log entry.

use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    audit_db: DatabaseConnection,
}

impl AppState {
    /// Creates a new `AppState` from the two database connections.
    ///
    /// `db` carries all request-scoped reads and the attendance insert;
    /// `audit_db` carries flagged-log writes only.
    pub fn new(db: DatabaseConnection, audit_db: DatabaseConnection) -> Self {
        Self { db, audit_db }
    }

    /// Returns a shared reference to the primary `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a shared reference to the audit `DatabaseConnection`.
    pub fn audit_db(&self) -> &DatabaseConnection {
        &self.audit_db
    }

    /// Returns a cloned copy of the primary database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    /// Returns a cloned copy of the audit database connection.
    pub fn audit_db_clone(&self) -> DatabaseConnection {
        self.audit_db.clone()
    }
}
