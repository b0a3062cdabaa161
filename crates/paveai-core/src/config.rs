//! Configuration module
//!
//! Loaded once at process start from the environment (a `.env` file is
//! honored in development). Storage credentials are required: without them no
//! token can ever be issued, so their absence is a startup failure rather
//! than a per-request error.

use std::env;

use crate::error::AppError;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_SAS_TTL_MINUTES: i64 = 60;
const DEFAULT_SAS_CLOCK_SKEW_MINUTES: i64 = 15;
const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 200;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    // Storage account credentials (secret; never logged, never sent to clients)
    pub storage_account_name: String,
    pub storage_account_key: String,
    pub storage_container: String,
    // SAS issuance policy
    pub sas_ttl_minutes: i64,
    pub sas_clock_skew_minutes: i64,
    pub sas_https_only: bool,
    // Video processing
    pub process_interpreter: String,
    pub process_script_path: String,
    pub uploads_dir: String,
    pub processed_dir: String,
    pub max_upload_size_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails with `AppError::Configuration` when the storage account name or
    /// key is missing or empty.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let storage_account_name = require_env("AZURE_STORAGE_ACCOUNT_NAME")?;
        let storage_account_key = require_env("AZURE_STORAGE_ACCOUNT_KEY")?;

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            cors_origins,
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or_else(|_| "development".to_string()),
            storage_account_name,
            storage_account_key,
            storage_container: env::var("AZURE_STORAGE_CONTAINER_NAME")
                .unwrap_or_else(|_| "videos".to_string()),
            sas_ttl_minutes: env::var("SAS_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SAS_TTL_MINUTES),
            sas_clock_skew_minutes: env::var("SAS_CLOCK_SKEW_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SAS_CLOCK_SKEW_MINUTES),
            sas_https_only: env::var("SAS_HTTPS_ONLY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            process_interpreter: env::var("PROCESS_INTERPRETER")
                .unwrap_or_else(|_| "python".to_string()),
            process_script_path: env::var("PROCESS_SCRIPT_PATH")
                .unwrap_or_else(|_| "process_video.py".to_string()),
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "public/uploads".to_string()),
            processed_dir: env::var("PROCESSED_DIR")
                .unwrap_or_else(|_| "public/processed".to_string()),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
        };

        // A non-positive window can never issue a valid token; fail at
        // startup, not per request.
        if config.sas_ttl_minutes <= 0 {
            return Err(AppError::Configuration(format!(
                "SAS_TTL_MINUTES must be positive, got {}",
                config.sas_ttl_minutes
            )));
        }
        if config.sas_clock_skew_minutes < 0 {
            return Err(AppError::Configuration(format!(
                "SAS_CLOCK_SKEW_MINUTES must not be negative, got {}",
                config.sas_clock_skew_minutes
            )));
        }

        Ok(config)
    }

    /// Check if the application is running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn require_env(name: &str) -> Result<String, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Configuration(format!(
            "{} environment variable not set",
            name
        ))),
    }
}
