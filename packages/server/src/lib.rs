pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lightbox Asset API",
        version = "1.0.0",
        description = "Image ingestion, browsing and maintenance for the media asset store"
    ),
    servers((url = "/api/v1/assets")),
    paths(
        handlers::upload::upload_asset,
        handlers::upload::upload_asset_widget,
        handlers::browse::get_tree,
        handlers::browse::get_subtree,
        handlers::files::serve_asset,
        handlers::files::delete_asset,
        handlers::admin::run_migration,
    ),
    tags(
        (name = "Assets", description = "Upload, serve and delete stored images"),
        (name = "Browse", description = "Hierarchy listing"),
        (name = "Admin", description = "Maintenance operations"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config);

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .with_state(state)
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(cors)
}

fn cors_layer(config: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors
        .allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(config.server.cors.max_age))
}
