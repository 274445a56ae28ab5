//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub selfie_storage_root: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    pub institution_name: String,
    pub institution_lat: f64,
    pub institution_lon: f64,
    pub geofence_radius_m: f64,
    pub max_selfie_bytes: u64,
    pub frontend_url: String,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// This method is used internally to populate the singleton. It panics
    /// if required variables are missing or improperly formatted.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "qr-attendance".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH").expect("DATABASE_PATH is required"),
            selfie_storage_root: env::var("SELFIE_STORAGE_ROOT")
                .unwrap_or_else(|_| "storage/selfies".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .unwrap(),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET is required"),
            jwt_duration_minutes: env::var("JWT_DURATION_MINUTES")
                .unwrap_or("60".into())
                .parse()
                .unwrap(),
            institution_name: env::var("INSTITUTION_NAME")
                .unwrap_or_else(|_| "Main Campus".into()),
            institution_lat: env::var("INSTITUTION_LAT")
                .unwrap_or("16.466167".into())
                .parse()
                .unwrap(),
            institution_lon: env::var("INSTITUTION_LON")
                .unwrap_or("80.674499".into())
                .parse()
                .unwrap(),
            geofence_radius_m: env::var("GEOFENCE_RADIUS_M")
                .unwrap_or("50.0".into())
                .parse()
                .unwrap(),
            max_selfie_bytes: env::var("MAX_SELFIE_BYTES")
                .unwrap_or("5242880".into())
                .parse()
                .unwrap(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap();
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_selfie_storage_root(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.selfie_storage_root = value.into());
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: u64) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value);
    }

    pub fn set_institution_name(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.institution_name = value.into());
    }

    pub fn set_institution_coords(lat: f64, lon: f64) {
        AppConfig::set_field(|cfg| {
            cfg.institution_lat = lat;
            cfg.institution_lon = lon;
        });
    }

    pub fn set_geofence_radius_m(value: f64) {
        AppConfig::set_field(|cfg| cfg.geofence_radius_m = value);
    }

    pub fn set_max_selfie_bytes(value: u64) {
        AppConfig::set_field(|cfg| cfg.max_selfie_bytes = value);
    }

    pub fn set_frontend_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.frontend_url = value.into());
    }
}

// --- Free accessor functions, the usual call sites ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn selfie_storage_root() -> String {
    AppConfig::global().selfie_storage_root.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn institution_name() -> String {
    AppConfig::global().institution_name.clone()
}

pub fn institution_lat() -> f64 {
    AppConfig::global().institution_lat
}

pub fn institution_lon() -> f64 {
    AppConfig::global().institution_lon
}

pub fn geofence_radius_m() -> f64 {
    AppConfig::global().geofence_radius_m
}

pub fn max_selfie_bytes() -> u64 {
    AppConfig::global().max_selfie_bytes
}

pub fn frontend_url() -> String {
    AppConfig::global().frontend_url.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_required_env() {
        // SAFETY: tests are serialized and set env before reading config.
        unsafe {
            env::set_var("DATABASE_PATH", "config-test.db");
            env::set_var("JWT_SECRET", "config-test-secret");
        }
    }

    #[test]
    #[serial]
    fn setters_override_and_reset_restores_env_defaults() {
        set_required_env();
        AppConfig::reset();

        assert_eq!(geofence_radius_m(), 50.0);

        AppConfig::set_geofence_radius_m(75.0);
        AppConfig::set_institution_coords(17.4446, 78.3498);
        assert_eq!(geofence_radius_m(), 75.0);
        assert_eq!(institution_lat(), 17.4446);

        AppConfig::reset();
        assert_eq!(geofence_radius_m(), 50.0);
        assert_eq!(institution_lat(), 16.466167);
    }

    #[test]
    #[serial]
    fn defaults_apply_when_optional_vars_are_unset() {
        set_required_env();
        AppConfig::reset();

        assert_eq!(max_selfie_bytes(), 5_242_880);
        assert_eq!(institution_lon(), 80.674499);
        assert_eq!(database_path(), "config-test.db");
    }
}
