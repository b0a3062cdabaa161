//! Core types for the PaveAI backend: configuration, errors, SAS signing.

pub mod config;
pub mod error;
pub mod sas;
pub mod validation;

pub use config::Config;
pub use error::AppError;
