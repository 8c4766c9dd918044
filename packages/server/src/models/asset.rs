use common::storage::ingest::IngestReport;
use serde::Serialize;

/// Response DTO for a successful upload.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Public URL the asset stays resolvable under.
    #[schema(example = "/api/v1/assets/files/project-assets/lifeblood/1735600000000-photo.webp")]
    pub url: String,
    /// Generated storage filename.
    #[schema(example = "1735600000000-photo.webp")]
    pub filename: String,
    /// Filename as uploaded.
    #[schema(example = "photo.jpg")]
    pub original_name: String,
    /// Upload size in bytes before transcoding.
    #[schema(example = 3_670_016)]
    pub original_size: u64,
    /// Stored size in bytes after transcoding.
    #[schema(example = 412_330)]
    pub compressed_size: u64,
    /// Space saved by transcoding.
    #[schema(example = "88.8%")]
    pub compression_ratio: String,
    /// MIME type of the stored bytes.
    #[schema(example = "image/webp")]
    pub mime_type: String,
}

impl UploadResponse {
    pub fn from_report(report: IngestReport, public_prefix: &str) -> Self {
        Self {
            url: format!("{public_prefix}/{}", report.relative_path),
            filename: report.filename,
            original_name: report.original_name,
            original_size: report.original_size,
            compressed_size: report.compressed_size,
            compression_ratio: report.compression_ratio,
            mime_type: report.mime_type,
        }
    }
}
