//! API-wide constants.

/// Prefix for all API routes.
pub const API_PREFIX: &str = "/api";

/// Public base path the processed artifacts are served under.
pub const PROCESSED_BASE_PATH: &str = "/processed";
