use hostel_core::config::{self as core_config, get_env};
use hostel_core::error::AppError;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct HostelConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub local_path: String,
}

impl HostelConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(HostelConfig {
            common,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("hostel_db"), is_prod)?,
            },
            storage: StorageConfig {
                local_path: get_env("STORAGE_LOCAL_PATH", Some("storage"), is_prod)?,
            },
        })
    }
}
