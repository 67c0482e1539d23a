//! In-memory document store for tests and local tooling.

use super::{ChangeKind, DocumentStore, StoreEvent};
use async_trait::async_trait;
use hostel_core::error::AppError;
use mongodb::bson::Document;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tokio::sync::RwLock;

/// Keyed documents per collection, behind an RwLock. Query semantics match
/// the trait contract: top-level field equality only.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, Document>>>,
    channels: Mutex<HashMap<String, broadcast::Sender<StoreEvent>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&self, collection: &str, id: &str, kind: ChangeKind) {
        let channels = self.channels.lock().expect("channel registry poisoned");
        if let Some(tx) = channels.get(collection) {
            // Nobody listening is fine.
            let _ = tx.send(StoreEvent {
                collection: collection.to_string(),
                id: id.to_string(),
                kind,
            });
        }
    }
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| doc.get(key) == Some(expected))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_if_absent(
        &self,
        collection: &str,
        id: &str,
        record: Document,
    ) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection.to_string()).or_default();
        if entries.contains_key(id) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Document '{}' already exists in '{}'",
                id,
                collection
            )));
        }
        entries.insert(id.to_string(), record);
        drop(collections);
        self.emit(collection, id, ChangeKind::Created);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|entries| entries.get(id))
            .cloned())
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;
        let entry = collections
            .get_mut(collection)
            .and_then(|entries| entries.get_mut(id))
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!(
                    "Document '{}' not found in '{}'",
                    id,
                    collection
                ))
            })?;
        for (key, value) in fields {
            entry.insert(key, value);
        }
        drop(collections);
        self.emit(collection, id, ChangeKind::Updated);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|entries| entries.remove(id))
            .is_some();
        drop(collections);
        if removed {
            self.emit(collection, id, ChangeKind::Deleted);
        }
        Ok(())
    }

    async fn query(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|entries| {
                entries
                    .values()
                    .filter(|doc| matches_filter(doc, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn subscribe(
        &self,
        collection: &str,
    ) -> Result<broadcast::Receiver<StoreEvent>, AppError> {
        let mut channels = self.channels.lock().expect("channel registry poisoned");
        let tx = channels
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(256).0);
        Ok(tx.subscribe())
    }
}
