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
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    /// Minutes a QR token stays valid after issuance.
    pub qr_token_expiry_minutes: i64,
    /// Seconds between runs of the expired-token purge task.
    pub qr_purge_interval_seconds: u64,
    /// Hours after creation during which an attendance status may still be changed.
    pub attendance_edit_window_hours: i64,
    /// How many days into the past an attendance date may lie.
    pub attendance_max_past_days: i64,
    /// Days after the attendance date during which anomalies may be registered.
    pub anomaly_window_days: i64,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_from_name: String,
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
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "senattend".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH").expect("DATABASE_PATH is required"),
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
            qr_token_expiry_minutes: env::var("QR_TOKEN_EXPIRY_MINUTES")
                .unwrap_or("3".into())
                .parse()
                .unwrap(),
            qr_purge_interval_seconds: env::var("QR_PURGE_INTERVAL_SECONDS")
                .unwrap_or("900".into())
                .parse()
                .unwrap(),
            attendance_edit_window_hours: env::var("ATTENDANCE_EDIT_WINDOW_HOURS")
                .unwrap_or("24".into())
                .parse()
                .unwrap(),
            attendance_max_past_days: env::var("ATTENDANCE_MAX_PAST_DAYS")
                .unwrap_or("7".into())
                .parse()
                .unwrap(),
            anomaly_window_days: env::var("ANOMALY_WINDOW_DAYS")
                .unwrap_or("3".into())
                .parse()
                .unwrap(),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            email_from_name: env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "SENAttend".into()),
        }
    }

    /// Installs a self-contained configuration so tests never depend on a
    /// `.env` file. No-op if the global config is already initialized.
    pub fn init_test_defaults() {
        CONFIG_INSTANCE.get_or_init(|| {
            RwLock::new(Self {
                env: "test".into(),
                project_name: "senattend".into(),
                log_level: "api=info".into(),
                log_file: "api.log".into(),
                log_to_stdout: false,
                database_path: "sqlite::memory:".into(),
                host: "127.0.0.1".into(),
                port: 3000,
                jwt_secret: "test-secret".into(),
                jwt_duration_minutes: 60,
                qr_token_expiry_minutes: 3,
                qr_purge_interval_seconds: 900,
                attendance_edit_window_hours: 24,
                attendance_max_past_days: 7,
                anomaly_window_days: 3,
                smtp_username: String::new(),
                smtp_password: String::new(),
                email_from_name: "SENAttend".into(),
            })
        });
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

    pub fn set_host(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.host = value.into());
    }

    pub fn set_port(value: u16) {
        AppConfig::set_field(|cfg| cfg.port = value);
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: u64) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value);
    }

    pub fn set_qr_token_expiry_minutes(value: i64) {
        AppConfig::set_field(|cfg| cfg.qr_token_expiry_minutes = value);
    }

    pub fn set_attendance_edit_window_hours(value: i64) {
        AppConfig::set_field(|cfg| cfg.attendance_edit_window_hours = value);
    }

    pub fn set_attendance_max_past_days(value: i64) {
        AppConfig::set_field(|cfg| cfg.attendance_max_past_days = value);
    }

    pub fn set_anomaly_window_days(value: i64) {
        AppConfig::set_field(|cfg| cfg.anomaly_window_days = value);
    }

    pub fn set_smtp_username(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.smtp_username = value.into());
    }

    pub fn set_smtp_password(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.smtp_password = value.into());
    }

    pub fn set_email_from_name(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.email_from_name = value.into());
    }
}

// --- Free accessors used across the workspace ---

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

pub fn qr_token_expiry_minutes() -> i64 {
    AppConfig::global().qr_token_expiry_minutes
}

pub fn qr_purge_interval_seconds() -> u64 {
    AppConfig::global().qr_purge_interval_seconds
}

pub fn attendance_edit_window_hours() -> i64 {
    AppConfig::global().attendance_edit_window_hours
}

pub fn attendance_max_past_days() -> i64 {
    AppConfig::global().attendance_max_past_days
}

pub fn anomaly_window_days() -> i64 {
    AppConfig::global().anomaly_window_days
}

pub fn smtp_username() -> String {
    AppConfig::global().smtp_username.clone()
}

pub fn smtp_password() -> String {
    AppConfig::global().smtp_password.clone()
}

pub fn email_from_name() -> String {
    AppConfig::global().email_from_name.clone()
}
