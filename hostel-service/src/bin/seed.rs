//! Seed the document store with the default configuration and a starter
//! room inventory. Safe to re-run: existing documents are left untouched.

use hostel_core::error::AppError;
use hostel_core::observability::init_tracing;
use hostel_service::config::HostelConfig;
use hostel_service::models::{
    BankAccount, CreateRoom, HostelSettings, RoomType, WaterCalculationMethod,
};
use hostel_service::services::{init_metrics, ResidencyService};
use hostel_service::store::{collections, to_document, DocumentStore, MongoStore, SETTINGS_DOC_ID};
use rust_decimal::Decimal;
use std::sync::Arc;

fn default_settings() -> HostelSettings {
    HostelSettings {
        name: "Full Moon Hostel".to_string(),
        address: "123 Moon Street, Bangkok".to_string(),
        water_calculation_method: WaterCalculationMethod::Unit,
        water_unit_price: Decimal::new(18, 0),
        water_price_per_person: Some(Decimal::new(100, 0)),
        electric_unit_price: Decimal::new(8, 0),
        late_fee_per_day: Decimal::new(50, 0),
        bank_account: BankAccount {
            bank_name: "K-Bank".to_string(),
            account_number: "123-4-56789-0".to_string(),
            account_name: "Full Moon Hostel Co., Ltd.".to_string(),
        },
    }
}

async fn seed(store: &MongoStore) -> Result<(), AppError> {
    let settings = default_settings();
    match store
        .create_if_absent(
            collections::SETTINGS,
            SETTINGS_DOC_ID,
            to_document(&settings)?,
        )
        .await
    {
        Ok(()) => tracing::info!("Wrote default hostel settings"),
        Err(AppError::Conflict(_)) => {
            tracing::info!("Hostel settings already present, leaving them untouched")
        }
        Err(e) => return Err(e),
    }

    let residency = ResidencyService::new(Arc::new(store.clone()));

    // Rooms 101-110: odd numbers fan, even numbers air, five per floor.
    for i in 1..=10u32 {
        let room_number = format!("1{:02}", i);
        let (room_type, base_price) = if i % 2 == 0 {
            (RoomType::StandardAir, Decimal::new(4500, 0))
        } else {
            (RoomType::StandardFan, Decimal::new(3500, 0))
        };
        let input = CreateRoom {
            room_number: room_number.clone(),
            floor: if i <= 5 { 1 } else { 2 },
            room_type,
            base_price,
            facilities: vec![
                "bed".to_string(),
                "wardrobe".to_string(),
                "desk".to_string(),
            ],
        };
        match residency.create_room(input).await {
            Ok(room) => tracing::info!(room = %room.room_number, "Room created"),
            Err(AppError::Conflict(_)) => {
                tracing::info!(room = %room_number, "Room already exists, skipping")
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load configuration
    let config = HostelConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    // Initialize tracing
    init_tracing(&config.common.service_name, &config.common.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        database = %config.mongodb.database,
        "Starting database seed"
    );

    // Initialize metrics
    init_metrics();

    let store = MongoStore::connect(&config.mongodb.uri, &config.mongodb.database)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to the document store");
            std::io::Error::other(format!("Store connection error: {}", e))
        })?;

    store.initialize_indexes().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to create indexes");
        std::io::Error::other(format!("Index error: {}", e))
    })?;

    seed(&store).await.map_err(|e| {
        tracing::error!(error = %e, "Seed failed");
        std::io::Error::other(format!("Seed error: {}", e))
    })?;

    tracing::info!("Seed complete");
    Ok(())
}
