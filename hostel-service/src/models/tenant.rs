//! Tenant model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relation: String,
}

/// A document attached to a tenant record (contract scan, ID copy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantDocument {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub url: String,
}

/// Tenant document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub tenant_id: String,
    pub full_name: String,
    pub id_card_number: String,
    pub phone_number: String,
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub current_room_id: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub contract_start_date: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub contract_end_date: DateTime<Utc>,
    pub deposit_amount: Decimal,
    #[serde(default)]
    pub documents: Vec<TenantDocument>,
}

/// Input for registering a tenant.
#[derive(Debug, Clone)]
pub struct RegisterTenant {
    pub tenant_id: String,
    pub full_name: String,
    pub id_card_number: String,
    pub phone_number: String,
    pub emergency_contact: EmergencyContact,
    pub room_number: Option<String>,
    pub contract_start_date: DateTime<Utc>,
    pub contract_end_date: DateTime<Utc>,
    pub deposit_amount: Decimal,
}
