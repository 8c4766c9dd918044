use tokio::task;
use tracing::info;

use super::error::StoreError;
use super::namespace::Namespace;
use super::paths;
use super::store::AssetStore;
use super::transcode;

/// One upload, as validated from the caller's fields.
pub struct IngestRequest {
    pub namespace: Namespace,
    pub group_id: String,
    pub original_filename: String,
    pub declared_mime: String,
    pub bytes: Vec<u8>,
    /// Ceiling for this call site (20 MiB endpoint, 5 MiB widget).
    pub max_bytes: u64,
}

/// What a successful ingest reports back to the caller.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// `{namespace}/{groupId}/{filename}` relative to the storage root.
    pub relative_path: String,
    /// Generated storage filename.
    pub filename: String,
    pub original_name: String,
    pub original_size: u64,
    pub compressed_size: u64,
    /// Space saved, formatted as a percentage.
    pub compression_ratio: String,
    pub mime_type: String,
}

/// Runs the upload pipeline: validate, transcode, allocate, persist.
///
/// Caller-input problems (bad MIME, oversize payload, empty group id) fail
/// before anything touches disk, and a transcoding failure aborts before a
/// path is ever allocated. Transcoding itself runs on the blocking pool;
/// decode/resize/encode is CPU-bound.
pub async fn ingest(store: &AssetStore, request: IngestRequest) -> Result<IngestReport, StoreError> {
    let IngestRequest {
        namespace,
        group_id,
        original_filename,
        declared_mime,
        bytes,
        max_bytes,
    } = request;

    paths::sanitize_group_id(&group_id)?;

    let original_size = bytes.len() as u64;
    let transcoded =
        task::spawn_blocking(move || transcode::transcode(&bytes, &declared_mime, max_bytes))
            .await
            .map_err(|e| StoreError::Decode(format!("transcode task failed: {e}")))??;

    let group = store.ensure_group(namespace, &group_id).await?;
    let stored = store
        .write(
            &group,
            paths::file_stem(&original_filename),
            &transcoded.extension,
            &transcoded.bytes,
        )
        .await?;

    info!(
        path = %stored.relative_path,
        original = original_size,
        compressed = stored.size,
        "asset ingested"
    );

    Ok(IngestReport {
        relative_path: stored.relative_path,
        filename: stored.filename,
        original_name: original_filename,
        original_size,
        compressed_size: stored.size,
        compression_ratio: transcoded.ratio_percent(),
        mime_type: transcoded.mime_type.to_string(),
    })
}
