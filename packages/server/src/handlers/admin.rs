use axum::Json;
use axum::extract::State;
use tracing::instrument;

use common::storage::migrate::{self, MigrationAction};

use crate::error::{AppError, ErrorBody};
use crate::models::admin::MigrateResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/migrations",
    tag = "Admin",
    operation_id = "runMigration",
    summary = "Move asset groups between namespaces",
    description = "Moves group directories from one namespace to another. Files already \
        present at the destination are left in place and counted as skipped, so re-running \
        the same migration is harmless.",
    request_body = MigrationAction,
    responses(
        (status = 200, description = "Migration summary", body = MigrateResponse),
        (status = 400, description = "Source and destination are the same namespace", body = ErrorBody),
        (status = 500, description = "Disk failure mid-move (STORAGE_WRITE_FAILURE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, action), fields(migration = %action.name))]
pub async fn run_migration(
    State(state): State<AppState>,
    Json(action): Json<MigrationAction>,
) -> Result<Json<MigrateResponse>, AppError> {
    let report = migrate::run(&state.store, &action).await?;
    Ok(Json(MigrateResponse::from_report(action.name, report)))
}
