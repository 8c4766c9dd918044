use common::storage::migrate::MigrationReport;
use serde::Serialize;

/// Response DTO for a successful deletion.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// Relative path that was removed.
    #[schema(example = "project-assets/lifeblood/1735600000000-photo.webp")]
    pub deleted: String,
}

/// Response DTO for a migration run.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MigrateResponse {
    /// Name of the action that ran.
    #[schema(example = "relocate-legacy-projects")]
    pub name: String,
    /// Asset groups that had files moved; 0 when re-running a completed
    /// migration.
    pub total_migrated: u64,
    pub files_moved: u64,
    pub files_skipped: u64,
}

impl MigrateResponse {
    pub fn from_report(name: String, report: MigrationReport) -> Self {
        Self {
            name,
            total_migrated: report.total_migrated,
            files_moved: report.files_moved,
            files_skipped: report.files_skipped,
        }
    }
}
