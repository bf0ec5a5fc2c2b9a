//! Stop types

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Delivery status of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum StopStatus {
    Pending,
    InRoute,
    Delivered,
    Failed,
}

impl Default for StopStatus {
    fn default() -> Self {
        StopStatus::Pending
    }
}

/// A delivery request. A stop may appear in at most one active route.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: Uuid,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub earliest_time: NaiveTime,
    pub latest_time: NaiveTime,
    pub package_weight_kg: f64,
    pub status: StopStatus,
}

/// Request to create a stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStopRequest {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub earliest_time: NaiveTime,
    pub latest_time: NaiveTime,
    pub package_weight_kg: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_status_default_is_pending() {
        assert_eq!(StopStatus::default(), StopStatus::Pending);
    }

    #[test]
    fn test_stop_status_serializes_snake_case() {
        let json = serde_json::to_string(&StopStatus::InRoute).unwrap();
        assert_eq!(json, "\"in_route\"");
    }

    #[test]
    fn test_create_stop_request_deserialize() {
        let json = r#"{
            "address": "123 Main St",
            "lat": 50.1,
            "lng": 14.5,
            "earliestTime": "08:00:00",
            "latestTime": "14:00:00",
            "packageWeightKg": 12.5
        }"#;

        let request: CreateStopRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.package_weight_kg, 12.5);
    }
}
