mod v1;

use axum::Router;

use crate::state::AppState;

/// Public URL prefix under which stored files are served.
pub const PUBLIC_FILES_PREFIX: &str = "/api/v1/assets/files";

pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/v1/assets", v1::routes())
}
