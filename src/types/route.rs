//! Route types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A solver output for a given vehicle on a given date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    pub total_distance_km: f64,
    pub total_time_min: f64,
}

/// Position of a stop within a route.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub route_id: Uuid,
    pub stop_id: Uuid,
    pub sequence: i32,
    pub planned_arrival: Option<String>,
    pub actual_arrival: Option<String>,
}

/// Request to submit a route-optimization job (C5 `submit`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlanJobRequest {
    pub depot_id: Uuid,
    pub vehicle_ids: Vec<Uuid>,
    pub stop_ids: Vec<Uuid>,
    pub date: NaiveDate,
}

/// Result of a completed optimization job, per spec.md §4.5.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlanResult {
    pub route_ids: Vec<Uuid>,
    pub total_distance_km: f64,
    pub greedy_distance_km: f64,
    pub improvement_pct: f64,
    pub num_routes: usize,
    pub score: RouteScore,
}

/// Aggregate scoring for a solved set of routes, per spec.md §4.3 "Scoring".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteScore {
    pub total_distance_km: f64,
    pub num_routes: usize,
    pub avg_stops_per_route: f64,
    pub unassigned: usize,
}

/// Ordered stop entry returned by `GET /routes/{route_id}/stops`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RouteStopSummary {
    pub stop_id: Uuid,
    pub sequence: i32,
    pub planned_arrival: Option<String>,
}

/// Enriched stop entry returned by `GET /routes/{route_id}/detail`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RouteStopDetail {
    pub stop_id: Uuid,
    pub sequence: i32,
    pub planned_arrival: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub earliest_time: String,
    pub latest_time: String,
    pub package_weight_kg: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_route_plan_job_request_deserialize() {
        let json = r#"{
            "depotId": "123e4567-e89b-12d3-a456-426614174000",
            "vehicleIds": ["123e4567-e89b-12d3-a456-426614174001"],
            "stopIds": ["123e4567-e89b-12d3-a456-426614174002"],
            "date": "2026-08-01"
        }"#;

        let request: RoutePlanJobRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.vehicle_ids.len(), 1);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
    }

    #[test]
    fn test_route_score_serialize_camel_case() {
        let score = RouteScore {
            total_distance_km: 8.0,
            num_routes: 1,
            avg_stops_per_route: 4.0,
            unassigned: 0,
        };
        let json = serde_json::to_string(&score).unwrap();
        assert!(json.contains("\"avgStopsPerRoute\":4.0"));
    }
}
