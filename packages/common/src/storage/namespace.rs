use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::StoreError;

/// Top-level classification of stored assets by content type.
///
/// This is a closed set: unknown values are rejected when parsing at the
/// boundary, never silently mapped to a default deeper in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Namespace {
    ProjectAssets,
    NewsAssets,
    AboutAssets,
    Other,
}

impl Namespace {
    pub const ALL: [Namespace; 4] = [
        Namespace::ProjectAssets,
        Namespace::NewsAssets,
        Namespace::AboutAssets,
        Namespace::Other,
    ];

    /// Directory name under the storage root.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectAssets => "project-assets",
            Self::NewsAssets => "news-assets",
            Self::AboutAssets => "about-assets",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ns| ns.as_str() == s)
            .ok_or_else(|| StoreError::InvalidIdentifier(format!("unknown namespace '{s}'")))
    }
}
