//! Application state.
//!
//! Built once at startup and shared read-only across requests: the loaded
//! configuration, the validated storage identity, and the detection-script
//! collaborator. No mutable state is shared between requests.

use std::path::PathBuf;
use std::sync::Arc;

use paveai_core::sas::StorageIdentity;
use paveai_core::{AppError, Config};
use paveai_processing::{ScriptDetector, VideoDetector};

pub struct AppState {
    pub config: Config,
    pub identity: StorageIdentity,
    pub detector: Arc<dyn VideoDetector>,
    pub uploads_dir: PathBuf,
    pub processed_dir: PathBuf,
}

impl AppState {
    /// Build state from configuration. Fails when the storage credentials do
    /// not form a valid identity (fail fast, before the server binds).
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let identity = StorageIdentity::new(
            config.storage_account_name.clone(),
            config.storage_account_key.clone(),
        )?;

        let detector: Arc<dyn VideoDetector> = Arc::new(ScriptDetector::new(
            config.process_interpreter.clone(),
            config.process_script_path.clone(),
        ));

        Ok(Self {
            uploads_dir: PathBuf::from(&config.uploads_dir),
            processed_dir: PathBuf::from(&config.processed_dir),
            config,
            identity,
            detector,
        })
    }
}
