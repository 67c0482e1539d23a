//! Maintenance request tracking over the document store.

use crate::models::{CreateMaintenanceRequest, MaintenanceRequest, RequestStatus};
use crate::services::metrics::{ERRORS_TOTAL, MAINTENANCE_REQUESTS_TOTAL};
use crate::store::{collections, get_as, query_as, to_document, DocumentStore};
use chrono::Utc;
use hostel_core::error::AppError;
use mongodb::bson::{doc, Document};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Filter parameters for listing maintenance requests.
#[derive(Debug, Clone, Default)]
pub struct ListRequestsFilter {
    pub status: Option<RequestStatus>,
    pub room_id: Option<String>,
    pub tenant_id: Option<String>,
}

pub struct MaintenanceService {
    store: Arc<dyn DocumentStore>,
}

impl MaintenanceService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// File a new request; it starts open.
    #[instrument(skip(self, input), fields(room = %input.room_id, tenant_id = %input.tenant_id))]
    pub async fn create_request(
        &self,
        input: CreateMaintenanceRequest,
    ) -> Result<MaintenanceRequest, AppError> {
        let request = MaintenanceRequest {
            request_id: Uuid::new_v4().to_string(),
            room_id: input.room_id,
            tenant_id: input.tenant_id,
            title: input.title,
            description: input.description,
            images: input.images,
            priority: input.priority,
            status: RequestStatus::Open,
            created_at: Utc::now(),
        };

        let record = to_document(&request)?;
        self.store
            .create_if_absent(collections::MAINTENANCE_REQUESTS, &request.request_id, record)
            .await?;

        MAINTENANCE_REQUESTS_TOTAL
            .with_label_values(&[request.priority.as_str()])
            .inc();
        info!(
            request_id = %request.request_id,
            priority = %request.priority.as_str(),
            "Maintenance request created"
        );

        Ok(request)
    }

    pub async fn get(&self, request_id: &str) -> Result<Option<MaintenanceRequest>, AppError> {
        get_as(
            self.store.as_ref(),
            collections::MAINTENANCE_REQUESTS,
            request_id,
        )
        .await
    }

    /// Move a request along its workflow. Backward moves and reopening a
    /// closed request are rejected.
    #[instrument(skip(self), fields(request_id = %request_id))]
    pub async fn set_status(
        &self,
        request_id: &str,
        next: RequestStatus,
    ) -> Result<MaintenanceRequest, AppError> {
        let request = self.get(request_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Maintenance request {} not found", request_id))
        })?;

        if !request.status.can_transition_to(next) {
            ERRORS_TOTAL.with_label_values(&["invalid_transition"]).inc();
            return Err(AppError::InvalidTransition(format!(
                "Maintenance request {} cannot move from {} to {}",
                request_id,
                request.status.as_str(),
                next.as_str()
            )));
        }

        self.store
            .update(
                collections::MAINTENANCE_REQUESTS,
                request_id,
                doc! { "status": next.as_str() },
            )
            .await?;

        info!(
            request_id = %request_id,
            from = %request.status.as_str(),
            to = %next.as_str(),
            "Maintenance request status changed"
        );

        Ok(MaintenanceRequest {
            status: next,
            ..request
        })
    }

    /// Requests matching the filter, newest first.
    pub async fn list(
        &self,
        filter: &ListRequestsFilter,
    ) -> Result<Vec<MaintenanceRequest>, AppError> {
        let mut query = Document::new();
        if let Some(status) = filter.status {
            query.insert("status", status.as_str());
        }
        if let Some(room_id) = &filter.room_id {
            query.insert("room_id", room_id);
        }
        if let Some(tenant_id) = &filter.tenant_id {
            query.insert("tenant_id", tenant_id);
        }

        let mut requests: Vec<MaintenanceRequest> = query_as(
            self.store.as_ref(),
            collections::MAINTENANCE_REQUESTS,
            query,
        )
        .await?;
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }
}
