//! Depot types

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A depot — fixed origin/return point for every route in a scenario.
/// Immutable per scenario; matrix index 0 is always reserved for the depot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Depot {
    pub id: Uuid,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
}

/// Request to create a depot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepotRequest {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_depot_request_deserialize() {
        let json = r#"{
            "name": "Main Depot",
            "lat": 50.0755,
            "lng": 14.4378,
            "openTime": "08:00:00",
            "closeTime": "18:00:00"
        }"#;

        let request: CreateDepotRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Main Depot");
        assert_eq!(request.open_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    }
}
