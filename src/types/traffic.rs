//! Rerouting types (C6)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single degraded edge in the time matrix, as reported by a traffic feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficEvent {
    pub from_idx: usize,
    pub to_idx: usize,
    #[serde(default = "default_delay_factor")]
    pub delay_factor: f64,
}

fn default_delay_factor() -> f64 {
    crate::defaults::DEFAULT_DELAY_FACTOR
}

/// Request to reroute an already-persisted route. `route_id` travels in the
/// payload rather than a URL path segment, since the NATS transport has no
/// path component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerouteRequest {
    pub route_id: Uuid,
    pub traffic_events: Vec<TrafficEvent>,
}

/// Register a sink for a route's reroute broadcasts (C7).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub route_id: Uuid,
}

/// The subscriber's handle plus the subject it will receive pushes on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub subscriber_id: Uuid,
    pub push_subject: String,
}

/// Drop a previously-registered sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeRequest {
    pub route_id: Uuid,
    pub subscriber_id: Uuid,
}

/// A single stop's recomputed ETA after a reroute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReroutedStop {
    pub stop_id: Uuid,
    pub sequence: i32,
    pub planned_arrival: String,
    pub planned_arrival_min: f64,
    pub lat: f64,
    pub lng: f64,
}

/// Response of a reroute call, also the payload broadcast to C7 subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerouteResponse {
    pub route_id: Uuid,
    pub rerouted: bool,
    pub stops: Vec<ReroutedStop>,
}
