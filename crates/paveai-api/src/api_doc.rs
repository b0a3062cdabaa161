//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PaveAI API",
        version = "0.1.0",
        description = "Backend for the PaveAI demo applications: short-lived storage access tokens and road-damage video processing."
    ),
    paths(
        handlers::sas_token::get_sas_token,
        handlers::process_video::process_video,
        handlers::health::health_check,
    ),
    components(schemas(
        handlers::sas_token::SasTokenResponse,
        handlers::process_video::ProcessVideoResponse,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "tokens", description = "Scoped storage credential issuance"),
        (name = "processing", description = "Video damage detection"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
