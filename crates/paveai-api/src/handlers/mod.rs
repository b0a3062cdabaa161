//! HTTP handlers.

pub mod health;
pub mod process_video;
pub mod sas_token;
