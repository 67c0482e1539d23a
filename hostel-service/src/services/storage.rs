//! Object storage collaborator for uploaded images (payment slips,
//! maintenance photos). The returned reference is an opaque string.

use async_trait::async_trait;
use hostel_core::error::AppError;
use std::path::PathBuf;
use tokio::fs;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store bytes under `key` and return a retrievable reference.
    async fn store(&self, key: &str, data: Vec<u8>) -> Result<String, AppError>;
    async fn download(&self, reference: &str) -> Result<Vec<u8>, AppError>;
    async fn delete(&self, reference: &str) -> Result<(), AppError>;
}

pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn store(&self, key: &str, data: Vec<u8>) -> Result<String, AppError> {
        let path = self.base_path.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, data).await?;
        Ok(key.to_string())
    }

    async fn download(&self, reference: &str) -> Result<Vec<u8>, AppError> {
        let path = self.base_path.join(reference);
        let data = fs::read(path).await?;
        Ok(data)
    }

    async fn delete(&self, reference: &str) -> Result<(), AppError> {
        let path = self.base_path.join(reference);
        if path.exists() {
            fs::remove_file(path).await?;
        }
        Ok(())
    }
}
