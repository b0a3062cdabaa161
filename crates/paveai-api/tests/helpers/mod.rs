//! Test helpers: build the router over a temp workspace with a stub
//! detection script, so no Python or storage account is needed.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use axum_test::TestServer;
use paveai_api::setup;
use paveai_core::Config;
use tempfile::TempDir;

/// Base64-encoded throwaway key; structurally valid, not a real credential.
pub const TEST_ACCOUNT_KEY: &str = "MDEyMzQ1Njc4OTAxMjM0NTY3ODkwMTIzNDU2Nzg5MDE=";

/// Stub script that copies its input to its output and exits 0.
pub const SCRIPT_OK: &str = "#!/bin/sh\ncp \"$1\" \"$2\"\n";

/// Stub script that fails with a distinctive exit code.
pub const SCRIPT_FAIL: &str = "#!/bin/sh\nexit 7\n";

pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

pub fn test_config(root: &Path, script: &Path) -> Config {
    Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        storage_account_name: "paveaiblob".to_string(),
        storage_account_key: TEST_ACCOUNT_KEY.to_string(),
        storage_container: "videos".to_string(),
        sas_ttl_minutes: 60,
        sas_clock_skew_minutes: 15,
        sas_https_only: false,
        process_interpreter: "/bin/sh".to_string(),
        process_script_path: script.to_string_lossy().into_owned(),
        uploads_dir: root.join("uploads").to_string_lossy().into_owned(),
        processed_dir: root.join("processed").to_string_lossy().into_owned(),
        max_upload_size_bytes: 10 * 1024 * 1024,
    }
}

/// Spin up a server whose detector runs the given stub script.
pub fn spawn_app(script_body: &str) -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let script = temp_dir.path().join("detect.sh");
    fs::write(&script, script_body).expect("write stub script");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod stub script");

    let config = test_config(temp_dir.path(), &script);
    let (_state, router) = setup::initialize_app(config).expect("initialize app");

    TestApp {
        server: TestServer::new(router).expect("start test server"),
        _temp_dir: temp_dir,
    }
}
