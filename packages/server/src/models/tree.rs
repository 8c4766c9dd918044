use common::HierarchyNode;
use serde::Serialize;

/// Response DTO for browse queries.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TreeResponse {
    /// Subtree the query was scoped to; empty for the storage root.
    #[schema(example = "project-assets/lifeblood")]
    pub path: String,
    pub nodes: Vec<HierarchyNode>,
}
