use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::tree::TreeResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/tree",
    tag = "Browse",
    operation_id = "getAssetTree",
    summary = "List the full asset hierarchy",
    responses(
        (status = 200, description = "Hierarchy rooted at the store", body = TreeResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn get_tree(State(state): State<AppState>) -> Result<Json<TreeResponse>, AppError> {
    let nodes = state.store.hierarchy(None).await?;
    Ok(Json(TreeResponse {
        path: String::new(),
        nodes,
    }))
}

#[utoipa::path(
    get,
    path = "/tree/{path}",
    tag = "Browse",
    operation_id = "getAssetSubtree",
    summary = "List the hierarchy under a subpath",
    description = "Returns the subtree rooted at the given relative path. A path that does \
        not exist yields an empty node list rather than an error.",
    params(("path" = String, Path, description = "Relative path inside the store")),
    responses(
        (status = 200, description = "Subtree nodes", body = TreeResponse),
        (status = 400, description = "Path escapes the store root (INVALID_PATH)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_subtree(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<TreeResponse>, AppError> {
    let nodes = state.store.hierarchy(Some(&path)).await?;
    Ok(Json(TreeResponse { path, nodes }))
}
