use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A capacitated vehicle, tied to a depot. Assigned to at most one route per date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub depot_id: Uuid,
    pub capacity_kg: f64,
    pub driver_name: String,
}

/// Request to create a new vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    pub depot_id: Uuid,
    pub capacity_kg: f64,
    pub driver_name: String,
}

/// Response for list of vehicles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleListResponse {
    pub items: Vec<Vehicle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_vehicle_request_deserialize() {
        let json = r#"{
            "depotId": "123e4567-e89b-12d3-a456-426614174000",
            "capacityKg": 500.0,
            "driverName": "Petr Novak"
        }"#;

        let request: CreateVehicleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.capacity_kg, 500.0);
        assert_eq!(request.driver_name, "Petr Novak");
    }

    #[test]
    fn test_vehicle_serialize_camel_case() {
        let vehicle = Vehicle {
            id: Uuid::nil(),
            depot_id: Uuid::nil(),
            capacity_kg: 250.0,
            driver_name: "Jana".to_string(),
        };

        let json = serde_json::to_string(&vehicle).unwrap();
        assert!(json.contains("\"capacityKg\":250.0"));
        assert!(json.contains("\"driverName\":\"Jana\""));
    }
}
