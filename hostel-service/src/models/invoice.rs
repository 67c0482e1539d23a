//! Invoice model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Invoice status. `Overdue` is a read-time annotation; stored invoices only
/// ever hold `Pending`, `Paid`, or `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "paid" => InvoiceStatus::Paid,
            "overdue" => InvoiceStatus::Overdue,
            "cancelled" => InvoiceStatus::Cancelled,
            _ => InvoiceStatus::Pending,
        }
    }
}

/// A single billable line on an invoice. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        LineItem {
            name: name.into(),
            amount,
        }
    }
}

/// Invoice document. An immutable financial record once persisted; only the
/// payment proof, paid state, and cancellation flag ever change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub room_id: String,
    pub tenant_id: String,
    pub month: u32,
    pub year: i32,
    pub status: InvoiceStatus,
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub payment_proof_url: Option<String>,
    #[serde(default)]
    pub paid_at: Option<mongodb::bson::DateTime>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Deterministic invoice id; doubles as the uniqueness key for one
    /// invoice per room per billing period.
    pub fn document_id(year: i32, month: u32, room_number: &str) -> String {
        format!("INV-{}{:02}-{}", year, month, room_number)
    }

    /// A pending invoice with a tenant-submitted payment proof, waiting for
    /// admin confirmation. Derived, never persisted as a status value.
    pub fn awaiting_review(&self) -> bool {
        self.status == InvoiceStatus::Pending && self.payment_proof_url.is_some()
    }

    /// Past its due date and still unpaid.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == InvoiceStatus::Pending && self.due_date < now
    }
}
