//! Route read, reroute, and subscription handlers (C4 read paths, C6, C7).

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use async_trait::async_trait;
use futures::StreamExt;
use sqlx::PgPool;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::db::queries;
use crate::db::RouteStoreError;
use crate::services::constraints::time_to_minutes;
use crate::services::rerouter::{self, RerouteStopInput};
use crate::services::routing::MatrixProvider;
use crate::services::subscription_hub::{self, Subscriber as HubSubscriber, HUB};
use crate::types::{
    Coordinates, ErrorResponse, Request, RerouteRequest, RerouteResponse, SubscribeRequest,
    SubscribeResponse, SuccessResponse, UnsubscribeRequest,
};

/// A subscription-hub sink that republishes onto an ordinary NATS subject.
/// A gateway process bridges that subject to a websocket connection.
struct NatsSink {
    id: Uuid,
    client: Client,
    subject: String,
}

#[async_trait]
impl HubSubscriber for NatsSink {
    async fn deliver(&self, payload: &RerouteResponse) -> Result<()> {
        let bytes = serde_json::to_vec(payload)?;
        self.client.publish(self.subject.clone(), bytes.into()).await?;
        Ok(())
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

fn push_subject(route_id: Uuid, subscriber_id: Uuid) -> String {
    format!("routeweave.routes.push.{}.{}", route_id, subscriber_id)
}

/// Handle `routeweave.routes.stops` requests — ordered `(stop_id, sequence,
/// planned_arrival)` per spec.md §6.
pub async fn handle_stops(client: Client, mut subscriber: Subscriber, pool: PgPool) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received routes.stops message");

        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<Uuid> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse routes.stops request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let route_id = request.payload;
        if queries::route::get_route(&pool, route_id).await?.is_none() {
            let error = ErrorResponse::new(request.id, "NOT_FOUND", RouteStoreError::NotFound("route").to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        match queries::route::get_route_stop_summaries(&pool, route_id).await {
            Ok(stops) => {
                let response = SuccessResponse::new(request.id, stops);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                error!("Failed to load route stops: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle `routeweave.routes.detail` requests — stops enriched with
/// coordinates and windows, per spec.md §6.
pub async fn handle_detail(client: Client, mut subscriber: Subscriber, pool: PgPool) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received routes.detail message");

        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<Uuid> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse routes.detail request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let route_id = request.payload;
        if queries::route::get_route(&pool, route_id).await?.is_none() {
            let error = ErrorResponse::new(request.id, "NOT_FOUND", RouteStoreError::NotFound("route").to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        match queries::route::get_route_stop_details(&pool, route_id).await {
            Ok(stops) => {
                let response = SuccessResponse::new(request.id, stops);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                error!("Failed to load route detail: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle `routeweave.routes.reroute` requests (C6): rebuild the matrix,
/// apply delays, recompute ETAs, and broadcast the result to C7 subscribers.
pub async fn handle_reroute(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    matrix_provider: Arc<MatrixProvider>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received routes.reroute message");

        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<RerouteRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse reroute request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let route_id = request.payload.route_id;

        let route = match queries::route::get_route(&pool, route_id).await? {
            Some(r) => r,
            None => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", RouteStoreError::NotFound("route").to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let vehicle = match queries::vehicle::get_vehicle(&pool, route.vehicle_id).await? {
            Some(v) => v,
            None => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", RouteStoreError::NotFound("vehicle").to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let depot = match queries::depot::get_depot(&pool, vehicle.depot_id).await? {
            Some(d) => d,
            None => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", RouteStoreError::NotFound("depot").to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let rows = match queries::route::get_route_stops_for_reroute(&pool, route_id).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Failed to load route stops for reroute: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let mut coords = vec![Coordinates::new(depot.lat, depot.lng)];
        coords.extend(rows.iter().map(|r| Coordinates::new(r.lat, r.lng)));

        let (_dist, mut time) = matrix_provider.build_matrices(&coords).await;
        rerouter::apply_traffic_events(&mut time, &request.payload.traffic_events);

        let stops: Vec<RerouteStopInput> = rows
            .iter()
            .map(|r| RerouteStopInput {
                stop_id: r.stop_id,
                sequence: r.sequence,
                lat: r.lat,
                lng: r.lng,
                earliest_min: time_to_minutes(r.earliest_time),
            })
            .collect();

        let response = rerouter::recompute_etas(
            route_id,
            &stops,
            &time,
            0,
            crate::defaults::DEFAULT_DISPATCH_MIN,
        );

        HUB.broadcast(route_id, &response).await;

        let success = SuccessResponse::new(request.id, response);
        let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
    }

    Ok(())
}

/// Handle `routeweave.routes.subscribe` requests (C7): register a sink that
/// republishes reroute payloads onto a dedicated push subject.
pub async fn handle_subscribe(client: Client, mut subscriber: Subscriber) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received routes.subscribe message");

        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<SubscribeRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse subscribe request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let route_id = request.payload.route_id;
        let subscriber_id = Uuid::new_v4();
        let subject = push_subject(route_id, subscriber_id);

        let sink = Arc::new(NatsSink { id: subscriber_id, client: client.clone(), subject: subject.clone() });
        subscription_hub::HUB.subscribe(route_id, sink);

        let response =
            SuccessResponse::new(request.id, SubscribeResponse { subscriber_id, push_subject: subject });
        let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
    }

    Ok(())
}

/// Handle `routeweave.routes.unsubscribe` requests (C7).
pub async fn handle_unsubscribe(client: Client, mut subscriber: Subscriber) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received routes.unsubscribe message");

        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<UnsubscribeRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse unsubscribe request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        subscription_hub::HUB.unsubscribe(request.payload.route_id, request.payload.subscriber_id);

        let response = SuccessResponse::new(request.id, serde_json::json!({ "unsubscribed": true }));
        let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_subject_includes_route_and_subscriber() {
        let route_id = Uuid::new_v4();
        let subscriber_id = Uuid::new_v4();
        let subject = push_subject(route_id, subscriber_id);
        assert!(subject.starts_with("routeweave.routes.push."));
        assert!(subject.contains(&route_id.to_string()));
        assert!(subject.contains(&subscriber_id.to_string()));
    }
}
