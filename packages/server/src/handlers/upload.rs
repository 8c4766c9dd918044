use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use common::Namespace;
use common::storage::ingest::{self, IngestRequest};

use crate::error::{AppError, ErrorBody};
use crate::models::asset::UploadResponse;
use crate::routes::PUBLIC_FILES_PREFIX;
use crate::state::AppState;

// Transport limits sit above the configured ceilings so an oversize payload
// reaches the ingest check and gets the structured PAYLOAD_TOO_LARGE reply
// instead of a connection-level abort. The slack covers multipart framing.
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(22 * 1024 * 1024)
}

pub fn widget_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(6 * 1024 * 1024)
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Assets",
    operation_id = "ingestAsset",
    summary = "Upload and normalize an image",
    description = "Ingests an image into the asset store. The `file` and `groupId` multipart \
        fields are required; `namespace` is optional and defaults to `project-assets`. \
        The image is re-encoded/resized per the storage policy and persisted under \
        `{namespace}/{groupId}/{timestamp}-{basename}{ext}`.",
    request_body(content_type = "multipart/form-data", description = "File upload with group metadata"),
    responses(
        (status = 201, description = "Asset stored", body = UploadResponse),
        (status = 400, description = "Missing fields or bad identifier (VALIDATION_ERROR, INVALID_IDENTIFIER)", body = ErrorBody),
        (status = 413, description = "Payload over the 20 MiB ceiling (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 415, description = "Not an image (INVALID_MEDIA_TYPE)", body = ErrorBody),
        (status = 500, description = "Disk failure (STORAGE_WRITE_FAILURE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_asset(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let max_bytes = state.config.storage.max_upload_bytes;
    run_upload(state, multipart, max_bytes).await
}

#[utoipa::path(
    post,
    path = "/upload/widget",
    tag = "Assets",
    operation_id = "ingestAssetWidget",
    summary = "Upload from the interactive uploader widget",
    description = "Same pipeline as `/upload`, with the widget's stricter 5 MiB ceiling.",
    request_body(content_type = "multipart/form-data", description = "File upload with group metadata"),
    responses(
        (status = 201, description = "Asset stored", body = UploadResponse),
        (status = 400, description = "Missing fields or bad identifier", body = ErrorBody),
        (status = 413, description = "Payload over the 5 MiB ceiling", body = ErrorBody),
        (status = 415, description = "Not an image (INVALID_MEDIA_TYPE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_asset_widget(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let max_bytes = state.config.storage.widget_max_upload_bytes;
    run_upload(state, multipart, max_bytes).await
}

/// A failed multipart read is a 413 when the transport body limit tripped,
/// a plain validation error otherwise.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("request body exceeds the upload limit".into())
    } else {
        AppError::Validation(format!("Multipart error: {err}"))
    }
}

async fn run_upload(
    state: AppState,
    mut multipart: Multipart,
    max_bytes: u64,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut group_id: Option<String> = None;
    let mut namespace: Option<Namespace> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
                let mime = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((filename, mime, bytes.to_vec()));
            }
            Some("groupId") => {
                let text = field.text().await.map_err(multipart_error)?;
                group_id = Some(text);
            }
            Some("namespace") => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    namespace = Some(text.trim().parse().map_err(AppError::from)?);
                }
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let (original_filename, declared_mime, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    let group_id = group_id.ok_or_else(|| AppError::Validation("Missing 'groupId' field".into()))?;
    // Historical callers omit the namespace; those uploads are project assets.
    let namespace = namespace.unwrap_or(Namespace::ProjectAssets);

    let report = ingest::ingest(
        &state.store,
        IngestRequest {
            namespace,
            group_id,
            original_filename,
            declared_mime,
            bytes,
            max_bytes,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse::from_report(report, PUBLIC_FILES_PREFIX)),
    ))
}
