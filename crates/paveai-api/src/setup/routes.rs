//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use paveai_core::AppError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, PROCESSED_BASE_PATH};
use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router, AppError> {
    let cors = setup_cors(&state)?;
    let max_body_bytes = state.config.max_upload_size_bytes;
    let processed_dir = state.processed_dir.clone();

    let app = Router::new()
        .route(
            &format!("{}/get-sas-token", API_PREFIX),
            get(handlers::sas_token::get_sas_token),
        )
        .route(
            &format!("{}/process", API_PREFIX),
            post(handlers::process_video::process_video),
        )
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
        .nest_service(PROCESSED_BASE_PATH, ServeDir::new(processed_dir))
        .route(
            &format!("{}/openapi.json", API_PREFIX),
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new(format!("{}/openapi.json", API_PREFIX))
                .path("/docs")
                .into(),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn setup_cors(state: &AppState) -> Result<CorsLayer, AppError> {
    let origins = &state.config.cors_origins;
    let cors = if origins.contains(&"*".to_string()) {
        if state.config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
