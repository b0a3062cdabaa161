use crate::constants::PROCESSED_BASE_PATH;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header::CONTENT_LENGTH, HeaderMap},
    Json,
};
use paveai_core::validation::sanitize_filename;
use paveai_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessVideoResponse {
    /// Path the processed artifact is served under.
    #[serde(rename = "outputUrl")]
    pub output_url: String,
}

/// Run the damage-detection script over an uploaded video.
///
/// The upload is written to the uploads directory, the script is invoked with
/// `(input path, output path)`, and on success the public path of the
/// annotated video is returned.
#[utoipa::path(
    post,
    path = "/api/process",
    tag = "processing",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video processed", body = ProcessVideoResponse),
        (status = 400, description = "No file uploaded", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Processing failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, multipart))]
pub async fn process_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<ProcessVideoResponse>, HttpAppError> {
    let limit = state.config.max_upload_size_bytes;
    if let Some(length) = content_length(&headers) {
        if length > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "Request body of {} bytes exceeds the upload limit of {} bytes",
                length, limit
            ))
            .into());
        }
    }

    let mut upload: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(e, limit))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload.mp4").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| map_multipart_error(e, limit))?;
            upload = Some((filename, data));
            break;
        }
    }

    let (filename, data) = upload.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;
    let safe_filename = sanitize_filename(&filename)?;
    let unique_id = Uuid::new_v4();

    tokio::fs::create_dir_all(&state.uploads_dir)
        .await
        .map_err(AppError::from)?;
    tokio::fs::create_dir_all(&state.processed_dir)
        .await
        .map_err(AppError::from)?;

    let input_path = state
        .uploads_dir
        .join(format!("{}-{}", unique_id, safe_filename));
    tokio::fs::write(&input_path, &data)
        .await
        .map_err(AppError::from)?;

    let output_filename = format!("{}-output.mp4", unique_id);
    let output_path = state.processed_dir.join(&output_filename);

    tracing::info!(
        filename = %safe_filename,
        file_size = data.len(),
        input = %input_path.display(),
        "Processing uploaded video"
    );

    state.detector.process(&input_path, &output_path).await?;

    let output_url = format!("{}/{}", PROCESSED_BASE_PATH, output_filename);
    tracing::info!(output_url = %output_url, "Video processed");

    Ok(Json(ProcessVideoResponse { output_url }))
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers.get(CONTENT_LENGTH)?.to_str().ok()?.parse().ok()
}

/// The request-body limit layer surfaces mid-stream as a multipart read
/// failure; report it as the size rejection it is rather than a parse error.
fn map_multipart_error(err: MultipartError, limit: usize) -> AppError {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(inner) = source {
        if inner.to_string().contains("length limit exceeded") {
            return AppError::PayloadTooLarge(format!(
                "Request body exceeds the upload limit of {} bytes",
                limit
            ));
        }
        source = inner.source();
    }
    AppError::BadRequest(format!("Invalid multipart request: {}", err))
}
