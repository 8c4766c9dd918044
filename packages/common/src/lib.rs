pub mod storage;

pub use storage::{AssetStore, HierarchyNode, Namespace, NodeKind, StoreError};
