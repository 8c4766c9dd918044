use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Storage root all namespaces live under.
    pub root: PathBuf,
    /// Payload ceiling for the standard ingest endpoint.
    pub max_upload_bytes: u64,
    /// Stricter ceiling for the interactive uploader widget.
    pub widget_max_upload_bytes: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.root", "./data/assets")?
            .set_default("storage.max_upload_bytes", 20 * 1024 * 1024i64)?
            .set_default("storage.widget_max_upload_bytes", 5 * 1024 * 1024i64)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., LIGHTBOX__STORAGE__ROOT)
            .add_source(Environment::with_prefix("LIGHTBOX").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
