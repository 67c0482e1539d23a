//! Utility meter reading model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Recorded water and electricity meter values for a room and period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeterReading {
    pub reading_id: String,
    pub room_id: String,
    pub month: u32,
    pub year: i32,
    pub water_meter_value: Decimal,
    pub electric_meter_value: Decimal,
    pub recorded_by: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub recorded_at: DateTime<Utc>,
}

/// Input for recording a meter reading.
#[derive(Debug, Clone)]
pub struct RecordReading {
    pub room_id: String,
    pub month: u32,
    pub year: i32,
    pub water_meter_value: Decimal,
    pub electric_meter_value: Decimal,
    pub recorded_by: String,
}
