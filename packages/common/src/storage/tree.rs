use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use tokio::fs;

use super::error::StoreError;

/// Extensions browsing UIs render as images; everything else that is not a
/// directory is a document.
const IMAGE_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico", "avif",
];

/// Classification of one hierarchy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Image,
    Document,
}

/// One entry in the browsable storage tree.
///
/// A read model: built on demand from the filesystem and never persisted.
/// It is correct as of the call that produced it, nothing more.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub name: String,
    /// Path relative to the storage root, forward slashes.
    pub path: String,
    pub kind: NodeKind,
    /// Byte size; folders have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Last modification, seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[schema(no_recursion)]
    pub children: Vec<HierarchyNode>,
}

/// Classify a filename by its extension.
pub fn classify(name: &str) -> NodeKind {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => NodeKind::Image,
        _ => NodeKind::Document,
    }
}

/// Recursively enumerates `dir`, producing one tree level with subfolders
/// listed before files, each partition in name order. A missing directory
/// yields an empty list, not an error. Symlinks are never followed.
pub async fn walk(dir: &Path, rel_prefix: &str) -> Result<Vec<HierarchyNode>, StoreError> {
    let mut read_dir = match fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut nodes = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        // Symlinks are skipped outright: following them could leave the
        // root or cycle forever.
        let file_type = entry.file_type().await?;
        if file_type.is_symlink() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if rel_prefix.is_empty() {
            name.clone()
        } else {
            format!("{rel_prefix}/{name}")
        };

        if file_type.is_dir() {
            let children = Box::pin(walk(&entry.path(), &rel)).await?;
            nodes.push(HierarchyNode {
                name,
                path: rel,
                kind: NodeKind::Folder,
                size: None,
                modified: None,
                children,
            });
        } else {
            let meta = entry.metadata().await?;
            let modified = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64);
            nodes.push(HierarchyNode {
                kind: classify(&name),
                name,
                path: rel,
                size: Some(meta.len()),
                modified,
                children: Vec::new(),
            });
        }
    }

    // Subfolders first, then by name; directory read order is not stable
    // across filesystems.
    nodes.sort_by(|a, b| {
        (a.kind != NodeKind::Folder, &a.name).cmp(&(b.kind != NodeKind::Folder, &b.name))
    });
    Ok(nodes)
}
