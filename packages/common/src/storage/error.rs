use thiserror::Error;

/// Errors surfaced by the asset store.
///
/// The caller-input variants (`InvalidMediaType`, `PayloadTooLarge`,
/// `InvalidIdentifier`, `InvalidPath`) are always detected before anything
/// is written and are never transient. `Io` covers disk failures; the store
/// performs no retries of its own.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The declared MIME type is not an image type.
    #[error("unsupported media type: {0}")]
    InvalidMediaType(String),
    /// The payload exceeds the ceiling enforced at its call site.
    #[error("payload of {actual} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { actual: u64, limit: u64 },
    /// A group id was empty or reduced to nothing by sanitization.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    /// A relative path contained traversal or escaped the storage root.
    #[error("invalid path: {0}")]
    InvalidPath(String),
    /// The target file does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The payload claimed to be an image but could not be decoded
    /// (or re-encoded) as one.
    #[error("image processing failed: {0}")]
    Decode(String),
    /// Disk/IO failure while touching storage.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for StoreError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err.to_string())
    }
}
