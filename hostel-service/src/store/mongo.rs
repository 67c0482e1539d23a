//! MongoDB-backed document store.

use super::{ChangeKind, DocumentStore, StoreEvent};
use crate::services::metrics::STORE_OP_DURATION;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use hostel_core::error::AppError;
use mongodb::bson::{doc, Document};
use mongodb::change_stream::event::OperationType;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client as MongoClient, Collection, Database, IndexModel};
use tokio::sync::broadcast;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    /// Secondary lookup indexes; the `_id` key already enforces the
    /// one-document-per-key constraint conditional creates rely on.
    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        info!("Creating MongoDB indexes for hostel-service");

        let invoices = self.collection(super::collections::INVOICES);
        let tenant_index = IndexModel::builder()
            .keys(doc! { "tenant_id": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("tenant_status_lookup".to_string())
                    .build(),
            )
            .build();
        invoices.create_index(tenant_index, None).await.map_err(|e| {
            tracing::error!("Failed to create tenant_status index on invoices: {}", e);
            AppError::from(e)
        })?;
        info!("Created index on invoices.(tenant_id, status)");

        let requests = self.collection(super::collections::MAINTENANCE_REQUESTS);
        let status_index = IndexModel::builder()
            .keys(doc! { "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("status_lookup".to_string())
                    .build(),
            )
            .build();
        requests.create_index(status_index, None).await.map_err(|e| {
            tracing::error!(
                "Failed to create status index on maintenance_requests: {}",
                e
            );
            AppError::from(e)
        })?;
        info!("Created index on maintenance_requests.status");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    #[instrument(skip(self, record), fields(collection = %collection, id = %id))]
    async fn create_if_absent(
        &self,
        collection: &str,
        id: &str,
        mut record: Document,
    ) -> Result<(), AppError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["create_if_absent"])
            .start_timer();

        record.insert("_id", id);
        let result = self.collection(collection).insert_one(record, None).await;

        timer.observe_duration();

        result.map(|_| ()).map_err(|e| {
            if let ErrorKind::Write(WriteFailure::WriteError(we)) = e.kind.as_ref() {
                if we.code == 11000 {
                    return AppError::Conflict(anyhow::anyhow!(
                        "Document '{}' already exists in '{}'",
                        id,
                        collection
                    ));
                }
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let timer = STORE_OP_DURATION.with_label_values(&["get"]).start_timer();

        let doc = self
            .collection(collection)
            .find_one(doc! { "_id": id }, None)
            .await?;

        timer.observe_duration();

        Ok(doc)
    }

    #[instrument(skip(self, patch), fields(collection = %collection, id = %id))]
    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), AppError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["update"])
            .start_timer();

        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": patch }, None)
            .await?;

        timer.observe_duration();

        if result.matched_count == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Document '{}' not found in '{}'",
                id,
                collection
            )));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["delete"])
            .start_timer();

        self.collection(collection)
            .delete_one(doc! { "_id": id }, None)
            .await?;

        timer.observe_duration();

        Ok(())
    }

    #[instrument(skip(self, filter), fields(collection = %collection))]
    async fn query(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["query"])
            .start_timer();

        let cursor = self.collection(collection).find(filter, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        timer.observe_duration();

        Ok(documents)
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn subscribe(
        &self,
        collection: &str,
    ) -> Result<broadcast::Receiver<StoreEvent>, AppError> {
        let mut stream = self
            .collection(collection)
            .watch(Vec::<Document>::new(), None)
            .await?;

        let (tx, rx) = broadcast::channel(256);
        let name = collection.to_string();
        tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                let event = match event {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!(collection = %name, error = %e, "Change stream ended");
                        break;
                    }
                };
                let kind = match event.operation_type {
                    OperationType::Insert => ChangeKind::Created,
                    OperationType::Update | OperationType::Replace => ChangeKind::Updated,
                    OperationType::Delete => ChangeKind::Deleted,
                    _ => continue,
                };
                let id = event
                    .document_key
                    .as_ref()
                    .and_then(|key| key.get_str("_id").ok())
                    .unwrap_or_default()
                    .to_string();
                if tx
                    .send(StoreEvent {
                        collection: name.clone(),
                        id,
                        kind,
                    })
                    .is_err()
                {
                    break;
                }
            }
        });

        Ok(rx)
    }
}
