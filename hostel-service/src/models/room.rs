//! Room model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Room occupancy status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Vacant,
    Occupied,
    Maintenance,
    Reserved,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Vacant => "vacant",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
            RoomStatus::Reserved => "reserved",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "occupied" => RoomStatus::Occupied,
            "maintenance" => RoomStatus::Maintenance,
            "reserved" => RoomStatus::Reserved,
            _ => RoomStatus::Vacant,
        }
    }
}

/// Room category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    StandardFan,
    StandardAir,
    Suite,
}

/// Room document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_number: String,
    pub floor: i32,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub base_price: Decimal,
    pub status: RoomStatus,
    #[serde(default)]
    pub current_tenant_id: Option<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
}

/// Input for creating a room.
#[derive(Debug, Clone)]
pub struct CreateRoom {
    pub room_number: String,
    pub floor: i32,
    pub room_type: RoomType,
    pub base_price: Decimal,
    pub facilities: Vec<String>,
}

impl From<CreateRoom> for Room {
    fn from(input: CreateRoom) -> Self {
        Room {
            room_number: input.room_number,
            floor: input.floor,
            room_type: input.room_type,
            base_price: input.base_price,
            status: RoomStatus::Vacant,
            current_tenant_id: None,
            facilities: input.facilities,
        }
    }
}
