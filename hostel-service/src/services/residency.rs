//! Room inventory and tenant residency over the document store.
//!
//! The invariant kept here: a tenant's `current_room_id` and the room's
//! `current_tenant_id` agree. Moving a tenant is two separate writes
//! (vacate, occupy); the store offers no multi-document transaction in this
//! flow, so a crash between them can briefly leave a room linked but marked
//! vacant. Re-running the move converges.

use crate::models::{CreateRoom, RegisterTenant, Room, RoomStatus, Tenant};
use crate::store::{collections, get_as, query_as, to_document, DocumentStore};
use hostel_core::error::AppError;
use mongodb::bson::{doc, Bson};
use std::sync::Arc;
use tracing::{info, instrument};

pub struct ResidencyService {
    store: Arc<dyn DocumentStore>,
}

impl ResidencyService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Add a room to the inventory, initially vacant.
    #[instrument(skip(self, input), fields(room = %input.room_number))]
    pub async fn create_room(&self, input: CreateRoom) -> Result<Room, AppError> {
        let room = Room::from(input);
        let record = to_document(&room)?;
        self.store
            .create_if_absent(collections::ROOMS, &room.room_number, record)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::Conflict(anyhow::anyhow!(
                    "Room {} already exists",
                    room.room_number
                )),
                other => other,
            })?;

        info!(room = %room.room_number, "Room created");
        Ok(room)
    }

    pub async fn get_room(&self, room_number: &str) -> Result<Option<Room>, AppError> {
        get_as(self.store.as_ref(), collections::ROOMS, room_number).await
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, AppError> {
        let mut rooms: Vec<Room> =
            query_as(self.store.as_ref(), collections::ROOMS, doc! {}).await?;
        rooms.sort_by(|a, b| a.room_number.cmp(&b.room_number));
        Ok(rooms)
    }

    pub async fn get_tenant(&self, tenant_id: &str) -> Result<Option<Tenant>, AppError> {
        get_as(self.store.as_ref(), collections::TENANTS, tenant_id).await
    }

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, AppError> {
        query_as(self.store.as_ref(), collections::TENANTS, doc! {}).await
    }

    /// Register a tenant and, when a room is given, occupy it.
    #[instrument(skip(self, input), fields(tenant_id = %input.tenant_id))]
    pub async fn register_tenant(&self, input: RegisterTenant) -> Result<Tenant, AppError> {
        if let Some(room_number) = &input.room_number {
            let room = self.require_room(room_number).await?;
            if room.status == RoomStatus::Occupied {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "Room {} is already occupied",
                    room_number
                )));
            }
        }

        let tenant = Tenant {
            tenant_id: input.tenant_id,
            full_name: input.full_name,
            id_card_number: input.id_card_number,
            phone_number: input.phone_number,
            emergency_contact: input.emergency_contact,
            current_room_id: input.room_number.clone(),
            contract_start_date: input.contract_start_date,
            contract_end_date: input.contract_end_date,
            deposit_amount: input.deposit_amount,
            documents: Vec::new(),
        };

        let record = to_document(&tenant)?;
        self.store
            .create_if_absent(collections::TENANTS, &tenant.tenant_id, record)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::Conflict(anyhow::anyhow!(
                    "Tenant {} is already registered",
                    tenant.tenant_id
                )),
                other => other,
            })?;

        if let Some(room_number) = &input.room_number {
            self.occupy(room_number, &tenant.tenant_id).await?;
        }

        info!(tenant_id = %tenant.tenant_id, "Tenant registered");
        Ok(tenant)
    }

    /// Move a tenant to another room: vacate the old one, occupy the new
    /// one, then update the tenant record.
    #[instrument(skip(self), fields(tenant_id = %tenant_id, room = %new_room_number))]
    pub async fn move_tenant(
        &self,
        tenant_id: &str,
        new_room_number: &str,
    ) -> Result<Tenant, AppError> {
        let tenant = self.require_tenant(tenant_id).await?;

        if tenant.current_room_id.as_deref() == Some(new_room_number) {
            return Ok(tenant);
        }

        let new_room = self.require_room(new_room_number).await?;
        if new_room.status != RoomStatus::Vacant {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Room {} is not vacant",
                new_room_number
            )));
        }

        if let Some(old_room_number) = &tenant.current_room_id {
            self.vacate(old_room_number).await?;
        }
        self.occupy(new_room_number, tenant_id).await?;

        self.store
            .update(
                collections::TENANTS,
                tenant_id,
                doc! { "current_room_id": new_room_number },
            )
            .await?;

        info!(
            tenant_id = %tenant_id,
            from = %tenant.current_room_id.as_deref().unwrap_or("-"),
            to = %new_room_number,
            "Tenant moved"
        );

        Ok(Tenant {
            current_room_id: Some(new_room_number.to_string()),
            ..tenant
        })
    }

    /// Remove a tenant and vacate their room.
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn remove_tenant(&self, tenant_id: &str) -> Result<(), AppError> {
        let tenant = self.require_tenant(tenant_id).await?;

        self.store.delete(collections::TENANTS, tenant_id).await?;
        if let Some(room_number) = &tenant.current_room_id {
            self.vacate(room_number).await?;
        }

        info!(tenant_id = %tenant_id, "Tenant removed");
        Ok(())
    }

    async fn require_room(&self, room_number: &str) -> Result<Room, AppError> {
        self.get_room(room_number).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Room {} not found", room_number))
        })
    }

    async fn require_tenant(&self, tenant_id: &str) -> Result<Tenant, AppError> {
        self.get_tenant(tenant_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Tenant {} not found", tenant_id))
        })
    }

    async fn occupy(&self, room_number: &str, tenant_id: &str) -> Result<(), AppError> {
        self.store
            .update(
                collections::ROOMS,
                room_number,
                doc! {
                    "status": RoomStatus::Occupied.as_str(),
                    "current_tenant_id": tenant_id,
                },
            )
            .await
    }

    async fn vacate(&self, room_number: &str) -> Result<(), AppError> {
        self.store
            .update(
                collections::ROOMS,
                room_number,
                doc! {
                    "status": RoomStatus::Vacant.as_str(),
                    "current_tenant_id": Bson::Null,
                },
            )
            .await
    }
}
