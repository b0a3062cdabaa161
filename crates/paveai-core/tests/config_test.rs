//! Config loading behavior.
//!
//! Environment variables are process-global, so every case runs inside a
//! single test function to avoid races with the parallel test runner.

use paveai_core::{AppError, Config};
use std::env;

const VARS: &[&str] = &[
    "AZURE_STORAGE_ACCOUNT_NAME",
    "AZURE_STORAGE_ACCOUNT_KEY",
    "AZURE_STORAGE_CONTAINER_NAME",
    "SAS_TTL_MINUTES",
    "SAS_CLOCK_SKEW_MINUTES",
    "SAS_HTTPS_ONLY",
    "PORT",
    "CORS_ORIGINS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn config_fails_fast_without_credentials_and_loads_with_them() {
    clear_env();

    // No credentials at all: refuse to start.
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, AppError::Configuration(_)));

    // Account name alone is not enough.
    env::set_var("AZURE_STORAGE_ACCOUNT_NAME", "paveaiblob");
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, AppError::Configuration(_)));
    assert!(err.to_string().contains("AZURE_STORAGE_ACCOUNT_KEY"));

    // An empty key still counts as missing.
    env::set_var("AZURE_STORAGE_ACCOUNT_KEY", "  ");
    assert!(Config::from_env().is_err());

    // Both present: defaults apply.
    env::set_var("AZURE_STORAGE_ACCOUNT_KEY", "c2VjcmV0LWtleQ==");
    let config = Config::from_env().unwrap();
    assert_eq!(config.storage_account_name, "paveaiblob");
    assert_eq!(config.server_port, 4000);
    assert_eq!(config.storage_container, "videos");
    assert_eq!(config.sas_ttl_minutes, 60);
    assert_eq!(config.sas_clock_skew_minutes, 15);
    assert!(!config.sas_https_only);
    assert_eq!(config.cors_origins, vec!["*".to_string()]);

    // Overrides are honored, bad numbers fall back to defaults.
    env::set_var("PORT", "8080");
    env::set_var("SAS_TTL_MINUTES", "30");
    env::set_var("SAS_CLOCK_SKEW_MINUTES", "not-a-number");
    env::set_var("SAS_HTTPS_ONLY", "true");
    env::set_var("CORS_ORIGINS", "https://app.example.com, https://admin.example.com");
    let config = Config::from_env().unwrap();
    assert_eq!(config.server_port, 8080);
    assert_eq!(config.sas_ttl_minutes, 30);
    assert_eq!(config.sas_clock_skew_minutes, 15);
    assert!(config.sas_https_only);
    assert_eq!(
        config.cors_origins,
        vec![
            "https://app.example.com".to_string(),
            "https://admin.example.com".to_string()
        ]
    );

    // A window that can never issue a valid token is a startup failure.
    env::set_var("SAS_TTL_MINUTES", "0");
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, AppError::Configuration(_)));
    assert!(err.to_string().contains("SAS_TTL_MINUTES"));

    env::set_var("SAS_TTL_MINUTES", "-30");
    assert!(Config::from_env().is_err());

    env::set_var("SAS_TTL_MINUTES", "60");
    env::set_var("SAS_CLOCK_SKEW_MINUTES", "-1");
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, AppError::Configuration(_)));
    assert!(err.to_string().contains("SAS_CLOCK_SKEW_MINUTES"));

    clear_env();
}
