//! Test helper module for hostel-service integration tests.
//!
//! Builds the services over the in-memory document store.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use hostel_service::models::{
    BankAccount, CreateRoom, EmergencyContact, HostelSettings, RegisterTenant, RoomType,
    WaterCalculationMethod,
};
use hostel_service::services::{BillingService, MaintenanceService, ResidencyService};
use hostel_service::store::{collections, to_document, DocumentStore, MemoryStore, SETTINGS_DOC_ID};
use rust_decimal::Decimal;
use std::sync::Arc;

pub const TEST_TENANT_ID: &str = "tenant-0001";

/// Whole-currency amount.
pub fn dec(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

/// Metered settings: water 18/unit, electricity 8/unit.
pub fn unit_settings() -> HostelSettings {
    HostelSettings {
        name: "Full Moon Hostel".to_string(),
        address: "123 Moon Street, Bangkok".to_string(),
        water_calculation_method: WaterCalculationMethod::Unit,
        water_unit_price: dec(18),
        water_price_per_person: Some(dec(100)),
        electric_unit_price: dec(8),
        late_fee_per_day: dec(50),
        bank_account: BankAccount {
            bank_name: "K-Bank".to_string(),
            account_number: "123-4-56789-0".to_string(),
            account_name: "Full Moon Hostel Co., Ltd.".to_string(),
        },
    }
}

/// Flat-rate settings; `rate` of `None` exercises the fallback.
pub fn person_settings(rate: Option<i64>) -> HostelSettings {
    HostelSettings {
        water_calculation_method: WaterCalculationMethod::Person,
        water_price_per_person: rate.map(dec),
        ..unit_settings()
    }
}

/// Services wired to one shared in-memory store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub billing: BillingService,
    pub residency: ResidencyService,
    pub maintenance: MaintenanceService,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            billing: BillingService::new(store.clone()),
            residency: ResidencyService::new(store.clone()),
            maintenance: MaintenanceService::new(store.clone()),
            store,
        }
    }

    /// App with metered settings already in place.
    pub async fn with_unit_settings() -> Self {
        let app = Self::new();
        app.put_settings(unit_settings()).await;
        app
    }

    pub async fn put_settings(&self, settings: HostelSettings) {
        self.store
            .create_if_absent(
                collections::SETTINGS,
                SETTINGS_DOC_ID,
                to_document(&settings).expect("serialize settings"),
            )
            .await
            .expect("store settings");
    }

    /// Create a room and move a tenant in.
    pub async fn add_occupied_room(&self, room_number: &str, base_price: i64, tenant_id: &str) {
        self.residency
            .create_room(sample_room(room_number, base_price))
            .await
            .expect("create room");
        self.residency
            .register_tenant(sample_tenant(tenant_id, Some(room_number)))
            .await
            .expect("register tenant");
    }
}

pub fn sample_room(room_number: &str, base_price: i64) -> CreateRoom {
    CreateRoom {
        room_number: room_number.to_string(),
        floor: 1,
        room_type: RoomType::StandardFan,
        base_price: dec(base_price),
        facilities: vec!["bed".to_string(), "wardrobe".to_string()],
    }
}

pub fn sample_tenant(tenant_id: &str, room_number: Option<&str>) -> RegisterTenant {
    RegisterTenant {
        tenant_id: tenant_id.to_string(),
        full_name: "Somchai Jai-dee".to_string(),
        id_card_number: "1234567890123".to_string(),
        phone_number: "0812345678".to_string(),
        emergency_contact: EmergencyContact {
            name: "Mom".to_string(),
            phone: "0899999999".to_string(),
            relation: "Mother".to_string(),
        },
        room_number: room_number.map(str::to_string),
        contract_start_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        contract_end_date: Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap(),
        deposit_amount: dec(5000),
    }
}
