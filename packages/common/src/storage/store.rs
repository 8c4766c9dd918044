use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use super::error::StoreError;
use super::namespace::Namespace;
use super::paths::{PathAllocator, sanitize_group_id};
use super::tree::{self, HierarchyNode};

/// Name of the staging directory for in-flight writes. Hidden from browsing.
const STAGING_DIR: &str = ".tmp";

/// Filesystem-backed asset store rooted at a single directory.
///
/// Every write is staged under `.tmp` and renamed into place, so a crashed
/// or aborted upload never leaves a partially written file reachable under
/// a public path.
pub struct AssetStore {
    root: PathBuf,
    allocator: PathAllocator,
}

/// Capability handle for one asset group directory, returned by
/// [`AssetStore::ensure_group`]. Holding one proves the directory exists.
pub struct GroupDir {
    namespace: Namespace,
    group_id: String,
    path: PathBuf,
}

impl GroupDir {
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A file successfully persisted by the store.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    /// `{namespace}/{groupId}/{filename}` relative to the storage root.
    pub relative_path: String,
    pub filename: String,
    pub size: u64,
}

impl AssetStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let staging = root.join(STAGING_DIR);
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(&staging).await?;

        // Anything still staged was abandoned mid-write by an earlier run
        // and can never be renamed into place again.
        let mut read_dir = fs::read_dir(&staging).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let _ = fs::remove_file(entry.path()).await;
        }

        Ok(Self {
            root,
            allocator: PathAllocator::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create-if-missing group directory. Idempotent, and safe under
    /// concurrent first writers to a new group.
    pub async fn ensure_group(
        &self,
        namespace: Namespace,
        group_id: &str,
    ) -> Result<GroupDir, StoreError> {
        let group = sanitize_group_id(group_id)?;
        let path = self.root.join(namespace.as_str()).join(&group);
        fs::create_dir_all(&path).await?;
        Ok(GroupDir {
            namespace,
            group_id: group,
            path,
        })
    }

    /// Persist `bytes` into `group` under a freshly allocated name.
    pub async fn write(
        &self,
        group: &GroupDir,
        base_name: &str,
        extension: &str,
        bytes: &[u8],
    ) -> Result<StoredAsset, StoreError> {
        // The allocator prevents same-process collisions; the existence
        // re-check also covers names left behind by earlier runs.
        let mut allocated =
            self.allocator
                .allocate(group.namespace, &group.group_id, base_name, extension)?;
        while fs::try_exists(group.path.join(&allocated.filename)).await? {
            allocated =
                self.allocator
                    .allocate(group.namespace, &group.group_id, base_name, extension)?;
        }

        let temp = self.root.join(STAGING_DIR).join(Uuid::new_v4().to_string());
        if let Err(e) = fs::write(&temp, bytes).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp, group.path.join(&allocated.filename)).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        debug!(path = %allocated.relative, size = bytes.len(), "asset written");
        Ok(StoredAsset {
            relative_path: allocated.relative,
            filename: allocated.filename,
            size: bytes.len() as u64,
        })
    }

    /// Resolve a caller-supplied relative path to an absolute path inside
    /// the root. Rejects traversal, empty segments, backslashes and the
    /// staging directory.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, StoreError> {
        let trimmed = relative.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(StoreError::InvalidPath("path is empty".into()));
        }
        if trimmed.contains('\0') || trimmed.contains('\\') {
            return Err(StoreError::InvalidPath(format!(
                "'{relative}' contains forbidden characters"
            )));
        }
        for segment in trimmed.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(StoreError::InvalidPath(format!(
                    "'{relative}' contains traversal or empty segments"
                )));
            }
        }
        // The staging directory holds in-flight writes and is never part of
        // the public path surface.
        if trimmed == STAGING_DIR || trimmed.starts_with(&format!("{STAGING_DIR}/")) {
            return Err(StoreError::InvalidPath(format!(
                "'{relative}' is not a public path"
            )));
        }
        Ok(self.root.join(trimmed))
    }

    /// Read one stored file for serving.
    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(relative)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(fs::read(&path).await?),
            Ok(_) => Err(StoreError::NotFound(relative.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(relative.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete one stored file. Never recurses into directories; emptying a
    /// group leaves its directory in place. A missing target is a distinct
    /// `NotFound`, so tooling can tell "already gone" from "deleted now".
    pub async fn delete(&self, relative: &str) -> Result<(), StoreError> {
        let path = self.resolve(relative)?;
        let meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(relative.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        if meta.is_dir() {
            return Err(StoreError::InvalidPath(format!(
                "'{relative}' is a directory, not a file"
            )));
        }
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(relative.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Browse the full hierarchy, or one subtree when `subpath` is given.
    /// An empty or missing root (or subtree) produces an empty list.
    pub async fn hierarchy(&self, subpath: Option<&str>) -> Result<Vec<HierarchyNode>, StoreError> {
        let (dir, prefix) = match subpath {
            Some(p) => {
                let abs = self.resolve(p)?;
                let prefix = p.trim().trim_matches('/').to_string();
                (abs, prefix)
            }
            None => (self.root.clone(), String::new()),
        };
        let mut nodes = tree::walk(&dir, &prefix).await?;
        nodes.retain(|n| n.name != STAGING_DIR);
        Ok(nodes)
    }
}
