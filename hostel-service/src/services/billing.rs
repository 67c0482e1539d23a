//! Invoice lifecycle over the document store.
//!
//! Stored invoices only ever hold `pending`, `paid`, or `cancelled`;
//! `overdue` and "awaiting review" are read-time views. Uniqueness of one
//! invoice per (room, month, year) rests on the store's conditional create,
//! never on the pre-check alone.

use crate::models::{
    HostelSettings, Invoice, InvoiceStatus, LineItem, MeterReading, RecordReading, Room,
    RoomStatus,
};
use crate::services::calculator::{compute_invoice, UsageInput};
use crate::services::metrics::{
    ERRORS_TOTAL, INVOICES_TOTAL, INVOICE_AMOUNT_TOTAL, PAYMENT_PROOFS_TOTAL,
};
use crate::store::{collections, get_as, query_as, to_document, DocumentStore, SETTINGS_DOC_ID};
use chrono::{DateTime, Duration, Utc};
use hostel_core::error::AppError;
use mongodb::bson::doc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Days between invoice creation and its due date. Policy constant, not
/// configurable per invoice.
const PAYMENT_GRACE_DAYS: i64 = 5;

/// Input for generating an invoice.
#[derive(Debug, Clone)]
pub struct GenerateInvoice {
    pub room_number: String,
    pub month: u32,
    pub year: i32,
    pub usage: UsageInput,
    pub extras: Vec<LineItem>,
}

pub struct BillingService {
    store: Arc<dyn DocumentStore>,
}

impl BillingService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Current settings snapshot, fetched fresh for each calculation.
    pub async fn load_settings(&self) -> Result<Option<HostelSettings>, AppError> {
        get_as(self.store.as_ref(), collections::SETTINGS, SETTINGS_DOC_ID).await
    }

    /// Compute and persist a pending invoice for a room and billing period.
    ///
    /// Fails with `DuplicateInvoice` when the period has already been
    /// invoiced for this room, regardless of which of two racing callers
    /// reaches the store first.
    #[instrument(
        skip(self, input),
        fields(room = %input.room_number, month = input.month, year = input.year)
    )]
    pub async fn generate_invoice(&self, input: GenerateInvoice) -> Result<Invoice, AppError> {
        if !(1..=12).contains(&input.month) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Month {} is outside 1-12",
                input.month
            )));
        }

        let settings = self.load_settings().await?;
        let room: Room = get_as(self.store.as_ref(), collections::ROOMS, &input.room_number)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Room {} not found", input.room_number))
            })?;

        let tenant_id = match (&room.status, &room.current_tenant_id) {
            (RoomStatus::Occupied, Some(tenant_id)) => tenant_id.clone(),
            _ => {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Room {} has no tenant to bill",
                    room.room_number
                )))
            }
        };

        if input.usage.water_new < input.usage.water_old {
            warn!(
                room = %room.room_number,
                old = %input.usage.water_old,
                new = %input.usage.water_new,
                "Water meter reading went backwards; charging zero"
            );
        }
        if input.usage.electric_new < input.usage.electric_old {
            warn!(
                room = %room.room_number,
                old = %input.usage.electric_old,
                new = %input.usage.electric_new,
                "Electric meter reading went backwards; charging zero"
            );
        }

        let computed = compute_invoice(&room, settings.as_ref(), &input.usage, &input.extras)?;

        let now = Utc::now();
        let invoice = Invoice {
            invoice_id: Invoice::document_id(input.year, input.month, &room.room_number),
            room_id: room.room_number.clone(),
            tenant_id,
            month: input.month,
            year: input.year,
            status: InvoiceStatus::Pending,
            items: computed.items,
            total_amount: computed.total,
            due_date: now + Duration::days(PAYMENT_GRACE_DAYS),
            payment_proof_url: None,
            paid_at: None,
            created_at: now,
        };

        let record = to_document(&invoice)?;
        self.store
            .create_if_absent(collections::INVOICES, &invoice.invoice_id, record)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => {
                    ERRORS_TOTAL.with_label_values(&["duplicate_invoice"]).inc();
                    AppError::DuplicateInvoice(format!(
                        "Billing period {}/{} for room {} has already been invoiced",
                        invoice.month, invoice.year, invoice.room_id
                    ))
                }
                other => other,
            })?;

        INVOICES_TOTAL.with_label_values(&["pending"]).inc();
        INVOICE_AMOUNT_TOTAL.inc_by(invoice.total_amount.to_f64().unwrap_or(0.0));

        info!(
            invoice_id = %invoice.invoice_id,
            total = %invoice.total_amount,
            "Invoice created"
        );

        Ok(invoice)
    }

    /// Attach a tenant-submitted payment proof. The invoice stays pending;
    /// "awaiting review" is inferred, never stored.
    #[instrument(skip(self, proof_url), fields(invoice_id = %invoice_id))]
    pub async fn attach_payment_proof(
        &self,
        invoice_id: &str,
        proof_url: &str,
    ) -> Result<Invoice, AppError> {
        let invoice = self.get_required(invoice_id).await?;

        if invoice.status != InvoiceStatus::Pending {
            ERRORS_TOTAL.with_label_values(&["invalid_transition"]).inc();
            return Err(AppError::InvalidTransition(format!(
                "Payment proof can only be attached to a pending invoice; {} is {}",
                invoice_id,
                invoice.status.as_str()
            )));
        }
        if invoice.payment_proof_url.is_some() {
            ERRORS_TOTAL.with_label_values(&["invalid_transition"]).inc();
            return Err(AppError::InvalidTransition(format!(
                "Invoice {} already has a payment proof awaiting review",
                invoice_id
            )));
        }

        self.store
            .update(
                collections::INVOICES,
                invoice_id,
                doc! { "payment_proof_url": proof_url },
            )
            .await?;

        PAYMENT_PROOFS_TOTAL.inc();
        info!(invoice_id = %invoice_id, "Payment proof attached");

        Ok(Invoice {
            payment_proof_url: Some(proof_url.to_string()),
            ..invoice
        })
    }

    /// Admin confirmation of payment. Only a pending invoice can be paid;
    /// paying twice fails rather than silently succeeding, so receivables
    /// are never double-booked.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn mark_paid(&self, invoice_id: &str) -> Result<Invoice, AppError> {
        let invoice = self.get_required(invoice_id).await?;

        match invoice.status {
            InvoiceStatus::Pending => {}
            InvoiceStatus::Paid => {
                ERRORS_TOTAL.with_label_values(&["invalid_transition"]).inc();
                return Err(AppError::InvalidTransition(format!(
                    "Invoice {} is already paid",
                    invoice_id
                )));
            }
            other => {
                ERRORS_TOTAL.with_label_values(&["invalid_transition"]).inc();
                return Err(AppError::InvalidTransition(format!(
                    "Invoice {} cannot be paid from status {}",
                    invoice_id,
                    other.as_str()
                )));
            }
        }

        let paid_at = mongodb::bson::DateTime::now();
        self.store
            .update(
                collections::INVOICES,
                invoice_id,
                doc! {
                    "status": InvoiceStatus::Paid.as_str(),
                    "paid_at": paid_at,
                },
            )
            .await?;

        INVOICES_TOTAL.with_label_values(&["paid"]).inc();
        info!(invoice_id = %invoice_id, "Invoice marked paid");

        Ok(Invoice {
            status: InvoiceStatus::Paid,
            paid_at: Some(paid_at),
            ..invoice
        })
    }

    /// Soft-cancel a pending invoice, keeping it auditable.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn cancel(&self, invoice_id: &str) -> Result<Invoice, AppError> {
        let invoice = self.get_required(invoice_id).await?;

        if invoice.status != InvoiceStatus::Pending {
            ERRORS_TOTAL.with_label_values(&["invalid_transition"]).inc();
            return Err(AppError::InvalidTransition(format!(
                "Only a pending invoice can be cancelled; {} is {}",
                invoice_id,
                invoice.status.as_str()
            )));
        }

        self.store
            .update(
                collections::INVOICES,
                invoice_id,
                doc! { "status": InvoiceStatus::Cancelled.as_str() },
            )
            .await?;

        INVOICES_TOTAL.with_label_values(&["cancelled"]).inc();
        info!(invoice_id = %invoice_id, "Invoice cancelled");

        Ok(Invoice {
            status: InvoiceStatus::Cancelled,
            ..invoice
        })
    }

    /// Hard delete for data correction. Works from any state and has no
    /// undo.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn delete(&self, invoice_id: &str) -> Result<(), AppError> {
        self.store.delete(collections::INVOICES, invoice_id).await?;
        info!(invoice_id = %invoice_id, "Invoice deleted");
        Ok(())
    }

    pub async fn get(&self, invoice_id: &str) -> Result<Option<Invoice>, AppError> {
        get_as(self.store.as_ref(), collections::INVOICES, invoice_id).await
    }

    async fn get_required(&self, invoice_id: &str) -> Result<Invoice, AppError> {
        self.get(invoice_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Invoice {} not found", invoice_id))
        })
    }

    /// All invoices, newest due date first.
    pub async fn list_all(&self) -> Result<Vec<Invoice>, AppError> {
        let mut invoices: Vec<Invoice> =
            query_as(self.store.as_ref(), collections::INVOICES, doc! {}).await?;
        invoices.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        Ok(invoices)
    }

    /// A tenant's invoices, newest due date first.
    pub async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<Invoice>, AppError> {
        let mut invoices: Vec<Invoice> = query_as(
            self.store.as_ref(),
            collections::INVOICES,
            doc! { "tenant_id": tenant_id },
        )
        .await?;
        invoices.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        Ok(invoices)
    }

    /// Unpaid invoices, for dashboard aggregation.
    pub async fn list_pending(&self) -> Result<Vec<Invoice>, AppError> {
        query_as(
            self.store.as_ref(),
            collections::INVOICES,
            doc! { "status": InvoiceStatus::Pending.as_str() },
        )
        .await
    }

    /// Read-time status: a pending invoice past its due date reads as
    /// overdue. Nothing is written back.
    pub fn effective_status(invoice: &Invoice, now: DateTime<Utc>) -> InvoiceStatus {
        if invoice.is_overdue(now) {
            InvoiceStatus::Overdue
        } else {
            invoice.status
        }
    }

    /// Display-only late fee for an overdue invoice; never folded into the
    /// stored total.
    pub fn late_fee(invoice: &Invoice, settings: &HostelSettings, now: DateTime<Utc>) -> Decimal {
        if !invoice.is_overdue(now) {
            return Decimal::ZERO;
        }
        let days_overdue = (now - invoice.due_date).num_days();
        Decimal::from(days_overdue) * settings.late_fee_per_day
    }

    /// Record the meter values for a room and period. One reading per
    /// (room, month, year).
    #[instrument(skip(self, input), fields(room = %input.room_id, month = input.month, year = input.year))]
    pub async fn record_reading(&self, input: RecordReading) -> Result<MeterReading, AppError> {
        if !(1..=12).contains(&input.month) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Month {} is outside 1-12",
                input.month
            )));
        }

        let reading = MeterReading {
            reading_id: format!("MR-{}{:02}-{}", input.year, input.month, input.room_id),
            room_id: input.room_id,
            month: input.month,
            year: input.year,
            water_meter_value: input.water_meter_value,
            electric_meter_value: input.electric_meter_value,
            recorded_by: input.recorded_by,
            recorded_at: Utc::now(),
        };

        let record = to_document(&reading)?;
        self.store
            .create_if_absent(collections::METER_READINGS, &reading.reading_id, record)
            .await?;

        info!(reading_id = %reading.reading_id, "Meter reading recorded");
        Ok(reading)
    }

    /// Most recent reading for a room, used to pre-fill the billing form.
    pub async fn latest_reading(&self, room_id: &str) -> Result<Option<MeterReading>, AppError> {
        let readings: Vec<MeterReading> = query_as(
            self.store.as_ref(),
            collections::METER_READINGS,
            doc! { "room_id": room_id },
        )
        .await?;
        Ok(readings
            .into_iter()
            .max_by_key(|reading| (reading.year, reading.month)))
    }
}
