use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use paveai_core::sas::{
    issue_account_sas, AccountSasOptions, AccountSasPermissions, AccountSasResourceTypes,
    AccountSasServices, SasProtocol,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Permission set issued with every token: read, write, delete, list, add,
/// create, update, process. Account-wide, blob service only. Clients depend
/// on this exact string; do not narrow it without versioning the endpoint.
const TOKEN_PERMISSIONS: &str = "rwdlacup";

#[derive(Debug, Serialize, ToSchema)]
pub struct SasTokenResponse {
    /// Signed query string; append to the account's blob endpoint URL.
    #[serde(rename = "sasToken")]
    pub sas_token: String,
}

/// Issue a short-lived account SAS token for the blob service.
#[utoipa::path(
    get,
    path = "/api/get-sas-token",
    tag = "tokens",
    responses(
        (status = 200, description = "Token issued", body = SasTokenResponse),
        (status = 500, description = "Token issuance failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_sas_token(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SasTokenResponse>, HttpAppError> {
    let now = Utc::now();
    let protocol = if state.config.sas_https_only {
        SasProtocol::Https
    } else {
        SasProtocol::HttpsAndHttp
    };

    let options = AccountSasOptions {
        permissions: AccountSasPermissions::parse(TOKEN_PERMISSIONS)?,
        services: AccountSasServices::blob_only(),
        resource_types: AccountSasResourceTypes::all(),
        protocol,
        // Backdated start tolerates caller/server clock drift.
        starts_on: now - Duration::minutes(state.config.sas_clock_skew_minutes),
        expires_on: now + Duration::minutes(state.config.sas_ttl_minutes),
    };

    let token = issue_account_sas(&state.identity, &options)?;

    tracing::debug!(
        account = %state.identity.account_name(),
        expires_on = %token.expires_on,
        "Issued account SAS token"
    );

    Ok(Json(SasTokenResponse {
        sas_token: token.to_string(),
    }))
}
