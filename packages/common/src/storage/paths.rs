use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;

use super::error::StoreError;
use super::namespace::Namespace;

/// Maximum length kept from a caller-supplied name component.
const MAX_COMPONENT_LEN: usize = 80;

/// Length of the tie-break token appended on same-millisecond allocations.
const TIE_BREAK_LEN: usize = 6;

/// Strips path separators, null bytes, control characters and leading dots
/// from a caller-supplied name component, then truncates it.
pub fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\'))
        .collect();
    cleaned
        .trim_start_matches('.')
        .chars()
        .take(MAX_COMPONENT_LEN)
        .collect()
}

/// Validates a caller-supplied group id, returning the sanitized slug.
pub fn sanitize_group_id(raw: &str) -> Result<String, StoreError> {
    let cleaned = sanitize_component(raw);
    if cleaned.is_empty() {
        return Err(StoreError::InvalidIdentifier(format!(
            "group id '{raw}' is empty after sanitization"
        )));
    }
    Ok(cleaned)
}

/// Returns the stem of an uploaded filename, without directories or the
/// final extension.
pub fn file_stem(original: &str) -> &str {
    Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload")
}

/// A freshly allocated, collision-free storage location.
#[derive(Debug, Clone)]
pub struct AllocatedPath {
    /// `{namespace}/{groupId}/{filename}`, forward slashes. This shape is
    /// part of the durable contract; external tooling depends on it.
    pub relative: String,
    /// Sanitized group id the path belongs to.
    pub group_id: String,
    /// Generated filename, `{millis}-{base}{ext}` or
    /// `{millis}-{base}-{token}{ext}` on a same-millisecond tie.
    pub filename: String,
}

/// Allocates storage paths named by allocation time.
///
/// Concurrent uploads into one group never overwrite each other: each upload
/// gets a distinct name before any byte is written, so no locking of the
/// group directory is needed. Two allocations within the same millisecond
/// are disambiguated with a short random token.
#[derive(Debug, Default)]
pub struct PathAllocator {
    last_millis: Mutex<i64>,
}

impl PathAllocator {
    pub fn allocate(
        &self,
        namespace: Namespace,
        group_id: &str,
        base_name: &str,
        extension: &str,
    ) -> Result<AllocatedPath, StoreError> {
        let group = sanitize_group_id(group_id)?;
        let mut base = sanitize_component(base_name);
        if base.is_empty() {
            base = "upload".to_string();
        }

        let millis = Utc::now().timestamp_millis();
        let tied = {
            let mut last = self.last_millis.lock().unwrap_or_else(|e| e.into_inner());
            let tied = *last == millis;
            *last = millis;
            tied
        };

        let filename = if tied {
            let token: String = rand::rng()
                .sample_iter(Alphanumeric)
                .take(TIE_BREAK_LEN)
                .map(char::from)
                .collect();
            format!("{millis}-{base}-{token}{extension}")
        } else {
            format!("{millis}-{base}{extension}")
        };

        Ok(AllocatedPath {
            relative: format!("{}/{}/{}", namespace.as_str(), group, filename),
            group_id: group,
            filename,
        })
    }
}
