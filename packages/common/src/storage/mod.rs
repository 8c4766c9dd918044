mod error;
mod namespace;

pub mod ingest;
pub mod migrate;
pub mod paths;
pub mod store;
pub mod transcode;
pub mod tree;

pub use error::StoreError;
pub use namespace::Namespace;
pub use store::{AssetStore, GroupDir, StoredAsset};
pub use tree::{HierarchyNode, NodeKind};
