use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    upload_routes()
        .merge(widget_upload_routes())
        .merge(browse_routes())
        .merge(file_routes())
        .merge(admin_routes())
}

fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::upload::upload_asset))
        .layer(handlers::upload::upload_body_limit())
}

fn widget_upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload/widget", post(handlers::upload::upload_asset_widget))
        .layer(handlers::upload::widget_upload_body_limit())
}

fn browse_routes() -> Router<AppState> {
    Router::new()
        .route("/tree", get(handlers::browse::get_tree))
        .route("/tree/{*path}", get(handlers::browse::get_subtree))
}

fn file_routes() -> Router<AppState> {
    Router::new().route(
        "/files/{*path}",
        get(handlers::files::serve_asset).delete(handlers::files::delete_asset),
    )
}

fn admin_routes() -> Router<AppState> {
    Router::new().route("/migrations", post(handlers::admin::run_migration))
}
