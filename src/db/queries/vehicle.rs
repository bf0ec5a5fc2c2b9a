//! Vehicle database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::vehicle::{CreateVehicleRequest, Vehicle};

/// Insert a new vehicle and return it.
pub async fn create_vehicle(pool: &PgPool, request: &CreateVehicleRequest) -> Result<Vehicle> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        INSERT INTO vehicles (id, depot_id, capacity_kg, driver_name)
        VALUES ($1, $2, $3, $4)
        RETURNING id, depot_id, capacity_kg, driver_name
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.depot_id)
    .bind(request.capacity_kg)
    .bind(&request.driver_name)
    .fetch_one(pool)
    .await?;

    Ok(vehicle)
}

/// Fetch a single vehicle by id.
pub async fn get_vehicle(pool: &PgPool, vehicle_id: Uuid) -> Result<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        "SELECT id, depot_id, capacity_kg, driver_name FROM vehicles WHERE id = $1",
    )
    .bind(vehicle_id)
    .fetch_optional(pool)
    .await?;

    Ok(vehicle)
}

/// List vehicles belonging to a set of ids — used by the job runner to load
/// the fleet for a submitted job in one round trip.
pub async fn list_vehicles_by_ids(pool: &PgPool, vehicle_ids: &[Uuid]) -> Result<Vec<Vehicle>> {
    let vehicles = sqlx::query_as::<_, Vehicle>(
        "SELECT id, depot_id, capacity_kg, driver_name FROM vehicles WHERE id = ANY($1)",
    )
    .bind(vehicle_ids)
    .fetch_all(pool)
    .await?;

    Ok(vehicles)
}

/// List all vehicles for a depot.
pub async fn list_vehicles_for_depot(pool: &PgPool, depot_id: Uuid) -> Result<Vec<Vehicle>> {
    let vehicles = sqlx::query_as::<_, Vehicle>(
        "SELECT id, depot_id, capacity_kg, driver_name FROM vehicles WHERE depot_id = $1",
    )
    .bind(depot_id)
    .fetch_all(pool)
    .await?;

    Ok(vehicles)
}
