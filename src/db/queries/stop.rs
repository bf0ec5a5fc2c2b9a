//! Stop database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::stop::{CreateStopRequest, Stop, StopStatus};

/// Insert a new stop (status defaults to `pending`) and return it.
pub async fn create_stop(pool: &PgPool, request: &CreateStopRequest) -> Result<Stop> {
    let stop = sqlx::query_as::<_, Stop>(
        r#"
        INSERT INTO stops (id, address, lat, lng, earliest_time, latest_time, package_weight_kg, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, address, lat, lng, earliest_time, latest_time, package_weight_kg, status
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&request.address)
    .bind(request.lat)
    .bind(request.lng)
    .bind(request.earliest_time)
    .bind(request.latest_time)
    .bind(request.package_weight_kg)
    .bind(StopStatus::Pending)
    .fetch_one(pool)
    .await?;

    Ok(stop)
}

/// Fetch a single stop by id.
pub async fn get_stop(pool: &PgPool, stop_id: Uuid) -> Result<Option<Stop>> {
    let stop = sqlx::query_as::<_, Stop>(
        r#"
        SELECT id, address, lat, lng, earliest_time, latest_time, package_weight_kg, status
        FROM stops WHERE id = $1
        "#,
    )
    .bind(stop_id)
    .fetch_optional(pool)
    .await?;

    Ok(stop)
}

/// List stops, optionally filtered by id set — used by the job runner to
/// load a batch in one round trip.
pub async fn list_stops_by_ids(pool: &PgPool, stop_ids: &[Uuid]) -> Result<Vec<Stop>> {
    let stops = sqlx::query_as::<_, Stop>(
        r#"
        SELECT id, address, lat, lng, earliest_time, latest_time, package_weight_kg, status
        FROM stops WHERE id = ANY($1)
        "#,
    )
    .bind(stop_ids)
    .fetch_all(pool)
    .await?;

    Ok(stops)
}

/// List all stops (paginated), newest-id-ordering is not meaningful for
/// UUID keys so results are ordered by address for stable pagination.
pub async fn list_stops(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Stop>> {
    let stops = sqlx::query_as::<_, Stop>(
        r#"
        SELECT id, address, lat, lng, earliest_time, latest_time, package_weight_kg, status
        FROM stops ORDER BY address LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(stops)
}

/// Update a stop's delivery status.
pub async fn update_stop_status(pool: &PgPool, stop_id: Uuid, status: StopStatus) -> Result<Option<Stop>> {
    let stop = sqlx::query_as::<_, Stop>(
        r#"
        UPDATE stops SET status = $2 WHERE id = $1
        RETURNING id, address, lat, lng, earliest_time, latest_time, package_weight_kg, status
        "#,
    )
    .bind(stop_id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(stop)
}
