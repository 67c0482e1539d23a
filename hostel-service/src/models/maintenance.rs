//! Maintenance request model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPriority {
    Low,
    Medium,
    High,
}

impl RequestPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestPriority::Low => "low",
            RequestPriority::Medium => "medium",
            RequestPriority::High => "high",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "low" => RequestPriority::Low,
            "high" => RequestPriority::High,
            _ => RequestPriority::Medium,
        }
    }
}

/// Request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Open => "open",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Resolved => "resolved",
            RequestStatus::Closed => "closed",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "in_progress" => RequestStatus::InProgress,
            "resolved" => RequestStatus::Resolved,
            "closed" => RequestStatus::Closed,
            _ => RequestStatus::Open,
        }
    }

    /// Forward-only workflow; `Closed` is terminal.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, next),
            (Open, InProgress)
                | (Open, Resolved)
                | (Open, Closed)
                | (InProgress, Resolved)
                | (InProgress, Closed)
                | (Resolved, Closed)
        )
    }
}

/// Maintenance request document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub request_id: String,
    pub room_id: String,
    pub tenant_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub priority: RequestPriority,
    pub status: RequestStatus,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Input for creating a maintenance request.
#[derive(Debug, Clone)]
pub struct CreateMaintenanceRequest {
    pub room_id: String,
    pub tenant_id: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub priority: RequestPriority,
}
