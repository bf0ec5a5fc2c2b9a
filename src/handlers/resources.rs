//! Thin CRUD handlers for depots, vehicles, and stops — persistence only,
//! no business rules beyond the schema's own CHECK constraints.

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use sqlx::PgPool;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::db::queries;
use crate::db::RouteStoreError;
use crate::types::{
    CreateDepotRequest, CreateStopRequest, CreateVehicleRequest, ErrorResponse, ListRequest,
    ListResponse, Request, SuccessResponse, VehicleListResponse,
};

/// Handle `routeweave.depots.create` requests.
pub async fn handle_depot_create(client: Client, mut subscriber: Subscriber, pool: PgPool) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received depots.create message");

        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<CreateDepotRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse depots.create request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let payload = request.payload;
        match queries::depot::create_depot(&pool, &payload.name, payload.lat, payload.lng, payload.open_time, payload.close_time).await {
            Ok(depot) => {
                let response = SuccessResponse::new(request.id, depot);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                error!("Failed to create depot: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle `routeweave.vehicles.create` requests.
pub async fn handle_vehicle_create(client: Client, mut subscriber: Subscriber, pool: PgPool) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received vehicles.create message");

        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<CreateVehicleRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse vehicles.create request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match queries::vehicle::create_vehicle(&pool, &request.payload).await {
            Ok(vehicle) => {
                let response = SuccessResponse::new(request.id, vehicle);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                error!("Failed to create vehicle: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle `routeweave.vehicles.list` requests — fleet for a depot.
pub async fn handle_vehicle_list(client: Client, mut subscriber: Subscriber, pool: PgPool) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received vehicles.list message");

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
                error!("Failed to parse vehicles.list request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match queries::vehicle::list_vehicles_for_depot(&pool, request.payload).await {
            Ok(vehicles) => {
                let response = SuccessResponse::new(request.id, VehicleListResponse { items: vehicles });
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                error!("Failed to list vehicles: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle `routeweave.vehicles.get` requests.
pub async fn handle_vehicle_get(client: Client, mut subscriber: Subscriber, pool: PgPool) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received vehicles.get message");

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
                error!("Failed to parse vehicles.get request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match queries::vehicle::get_vehicle(&pool, request.payload).await {
            Ok(Some(vehicle)) => {
                let response = SuccessResponse::new(request.id, vehicle);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", RouteStoreError::NotFound("vehicle").to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to fetch vehicle: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle `routeweave.stops.create` requests.
pub async fn handle_stop_create(client: Client, mut subscriber: Subscriber, pool: PgPool) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received stops.create message");

        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<CreateStopRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse stops.create request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match queries::stop::create_stop(&pool, &request.payload).await {
            Ok(stop) => {
                let response = SuccessResponse::new(request.id, stop);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                error!("Failed to create stop: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle `routeweave.stops.list` requests — paginated.
pub async fn handle_stop_list(client: Client, mut subscriber: Subscriber, pool: PgPool) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received stops.list message");

        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<ListRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse stops.list request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let limit = request.payload.limit;
        let offset = request.payload.offset;

        match queries::stop::list_stops(&pool, limit, offset).await {
            Ok(stops) => {
                let total = stops.len() as i64;
                let response = SuccessResponse::new(
                    request.id,
                    ListResponse { items: stops, total, limit, offset },
                );
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                error!("Failed to list stops: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle `routeweave.stops.get` requests.
pub async fn handle_stop_get(client: Client, mut subscriber: Subscriber, pool: PgPool) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received stops.get message");

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
                error!("Failed to parse stops.get request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match queries::stop::get_stop(&pool, request.payload).await {
            Ok(Some(stop)) => {
                let response = SuccessResponse::new(request.id, stop);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", RouteStoreError::NotFound("stop").to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to fetch stop: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}
