use axum::Json;
use axum::extract::{Path, State};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::models::admin::DeleteResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/files/{path}",
    tag = "Assets",
    operation_id = "serveAsset",
    summary = "Serve a stored asset's bytes",
    params(("path" = String, Path, description = "Relative path inside the store")),
    responses(
        (status = 200, description = "Raw file bytes with a guessed content type"),
        (status = 400, description = "Path escapes the store root (INVALID_PATH)", body = ErrorBody),
        (status = 404, description = "No such file (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn serve_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state.store.read(&path).await?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(mime.as_ref())
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    );

    Ok((headers, bytes))
}

#[utoipa::path(
    delete,
    path = "/files/{path}",
    tag = "Assets",
    operation_id = "deleteAsset",
    summary = "Delete a stored asset",
    description = "Removes a single file. Deleting a path that no longer exists is reported \
        as NOT_FOUND so callers can tell a repeat delete from a successful one.",
    params(("path" = String, Path, description = "Relative path inside the store")),
    responses(
        (status = 200, description = "File removed", body = DeleteResponse),
        (status = 400, description = "Path escapes the store root or names a directory", body = ErrorBody),
        (status = 404, description = "No such file (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.store.delete(&path).await?;
    info!(%path, "asset deleted");
    Ok(Json(DeleteResponse { deleted: path }))
}
