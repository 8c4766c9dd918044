use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

use super::error::StoreError;
use super::namespace::Namespace;
use super::store::AssetStore;

/// A named, administrator-invoked relocation of asset groups between
/// namespaces, used to correct historical misplacement.
///
/// Running the same action twice is safe: files already present at the
/// destination are skipped, and drained source groups are gone, so the
/// second run reports zero migrated groups.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MigrationAction {
    /// Label used in logs and the report.
    pub name: String,
    pub from: Namespace,
    pub to: Namespace,
    /// Specific group ids to move; every group under `from` when omitted.
    #[serde(default)]
    pub groups: Option<Vec<String>>,
}

/// Outcome of one migration run.
#[derive(Debug, Default, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// Asset groups that had at least one file moved.
    pub total_migrated: u64,
    pub files_moved: u64,
    /// Files left in place because the destination already had them.
    pub files_skipped: u64,
}

/// Executes a migration action against the store.
pub async fn run(store: &AssetStore, action: &MigrationAction) -> Result<MigrationReport, StoreError> {
    if action.from == action.to {
        return Err(StoreError::InvalidIdentifier(
            "source and destination namespaces are identical".into(),
        ));
    }

    let source_root = store.root().join(action.from.as_str());
    let group_ids = match &action.groups {
        Some(ids) => ids
            .iter()
            .map(|id| super::paths::sanitize_group_id(id))
            .collect::<Result<Vec<_>, _>>()?,
        None => list_group_dirs(&source_root).await?,
    };

    let mut report = MigrationReport::default();
    for group_id in group_ids {
        let source = source_root.join(&group_id);
        if !fs::try_exists(&source).await? {
            // Already migrated by a previous run, or never existed.
            continue;
        }

        let dest = store.ensure_group(action.to, &group_id).await?;
        let mut moved = 0u64;
        let mut read_dir = fs::read_dir(&source).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            if entry.metadata().await?.is_dir() {
                continue;
            }
            let target = dest.path().join(entry.file_name());
            if fs::try_exists(&target).await? {
                warn!(
                    file = %entry.path().display(),
                    "destination already has this file, skipping"
                );
                report.files_skipped += 1;
                continue;
            }
            fs::rename(entry.path(), &target).await?;
            moved += 1;
        }

        report.files_moved += moved;
        if moved > 0 {
            report.total_migrated += 1;
        }
        if dir_is_empty(&source).await? {
            fs::remove_dir(&source).await?;
        }
    }

    info!(
        action = %action.name,
        migrated = report.total_migrated,
        files = report.files_moved,
        skipped = report.files_skipped,
        "migration finished"
    );
    Ok(report)
}

/// Names of the group directories directly under a namespace root. A
/// missing namespace root means nothing to migrate.
async fn list_group_dirs(source_root: &Path) -> Result<Vec<String>, StoreError> {
    let mut read_dir = match fs::read_dir(source_root).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut groups = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        if entry.metadata().await?.is_dir() {
            groups.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(groups)
}

async fn dir_is_empty(dir: &Path) -> Result<bool, StoreError> {
    let mut read_dir = fs::read_dir(dir).await?;
    Ok(read_dir.next_entry().await?.is_none())
}
