//! Document store collaborator: keyed CRUD, conditional creates,
//! field-equality queries, and a per-collection change feed.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use hostel_core::error::AppError;
use mongodb::bson::Document;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;

/// Collection names, matching the hosted database layout.
pub mod collections {
    pub const SETTINGS: &str = "hostel_settings";
    pub const ROOMS: &str = "rooms";
    pub const TENANTS: &str = "tenants";
    pub const METER_READINGS: &str = "meter_readings";
    pub const INVOICES: &str = "invoices";
    pub const MAINTENANCE_REQUESTS: &str = "maintenance_requests";
}

/// Document id of the settings singleton.
pub const SETTINGS_DOC_ID: &str = "config";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// A change notification for one document.
#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub collection: String,
    pub id: String,
    pub kind: ChangeKind,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Conditional create: fails with `Conflict` when the key already
    /// exists. Never an upsert.
    async fn create_if_absent(
        &self,
        collection: &str,
        id: &str,
        record: Document,
    ) -> Result<(), AppError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError>;

    /// Merge `fields` into an existing document; `NotFound` when missing.
    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), AppError>;

    /// Idempotent delete.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError>;

    /// All documents whose top-level fields equal those in `filter`.
    async fn query(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError>;

    /// Change feed for one collection.
    async fn subscribe(
        &self,
        collection: &str,
    ) -> Result<broadcast::Receiver<StoreEvent>, AppError>;
}

/// Fetch and deserialize one document.
pub async fn get_as<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, AppError> {
    match store.get(collection, id).await? {
        Some(doc) => Ok(Some(mongodb::bson::from_document(doc)?)),
        None => Ok(None),
    }
}

/// Query and deserialize matching documents.
pub async fn query_as<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    filter: Document,
) -> Result<Vec<T>, AppError> {
    store
        .query(collection, filter)
        .await?
        .into_iter()
        .map(|doc| mongodb::bson::from_document(doc).map_err(AppError::from))
        .collect()
}

/// Serialize a record for storage.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, AppError> {
    Ok(mongodb::bson::to_document(value)?)
}
