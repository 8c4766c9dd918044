use std::sync::Arc;

use common::AssetStore;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AssetStore>,
    pub config: AppConfig,
}
