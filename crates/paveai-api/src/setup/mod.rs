//! Application setup: state, routes, server, telemetry.

pub mod routes;
pub mod server;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use paveai_core::{AppError, Config};

use crate::state::AppState;

/// Build the application state and router from configuration.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), AppError> {
    let state = Arc::new(AppState::from_config(config)?);
    let router = routes::setup_routes(state.clone())?;
    Ok((state, router))
}
