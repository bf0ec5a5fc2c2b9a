//! Depot database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::depot::Depot;

/// Insert a new depot and return it.
pub async fn create_depot(
    pool: &PgPool,
    name: &str,
    lat: f64,
    lng: f64,
    open_time: chrono::NaiveTime,
    close_time: chrono::NaiveTime,
) -> Result<Depot> {
    let depot = sqlx::query_as::<_, Depot>(
        r#"
        INSERT INTO depots (id, name, lat, lng, open_time, close_time)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, lat, lng, open_time, close_time
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(lat)
    .bind(lng)
    .bind(open_time)
    .bind(close_time)
    .fetch_one(pool)
    .await?;

    Ok(depot)
}

/// Fetch a single depot by id.
pub async fn get_depot(pool: &PgPool, depot_id: Uuid) -> Result<Option<Depot>> {
    let depot = sqlx::query_as::<_, Depot>(
        "SELECT id, name, lat, lng, open_time, close_time FROM depots WHERE id = $1",
    )
    .bind(depot_id)
    .fetch_optional(pool)
    .await?;

    Ok(depot)
}
