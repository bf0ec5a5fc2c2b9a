//! Route and RouteStop database queries (C4 — route store).

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::types::route::{Route, RouteStop, RouteStopDetail, RouteStopSummary};

/// A stop as the rerouter needs it: position, coordinates, and window
/// lower bound — enough to rebuild a matrix and walk ETAs.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RerouteStopRow {
    pub stop_id: Uuid,
    pub sequence: i32,
    pub lat: f64,
    pub lng: f64,
    pub earliest_time: NaiveTime,
}

/// One stop's position in a solved route, ready to persist.
pub struct PlannedStop {
    pub stop_id: Uuid,
    pub sequence: i32,
    pub planned_arrival: Option<String>,
}

/// Insert one route header plus its ordered stops against an
/// already-open transaction, per spec.md §4.4: "insert a Route row,
/// obtain its identifier, then insert RouteStop rows in sequence order."
/// Does not commit — a whole job's routes share one transaction, committed
/// once by the caller after every route has been inserted (§4.4 "Commit
/// once at the end of a job").
pub async fn insert_route_with_stops(
    tx: &mut Transaction<'_, Postgres>,
    vehicle_id: Uuid,
    date: NaiveDate,
    total_distance_km: f64,
    total_time_min: f64,
    stops: &[PlannedStop],
) -> Result<Route> {
    let route = sqlx::query_as::<_, Route>(
        r#"
        INSERT INTO routes (id, vehicle_id, date, total_distance_km, total_time_min)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, vehicle_id, date, total_distance_km, total_time_min
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(vehicle_id)
    .bind(date)
    .bind(total_distance_km)
    .bind(total_time_min)
    .fetch_one(&mut **tx)
    .await?;

    for stop in stops {
        sqlx::query(
            r#"
            INSERT INTO route_stops (route_id, stop_id, sequence, planned_arrival)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(route.id)
        .bind(stop.stop_id)
        .bind(stop.sequence)
        .bind(&stop.planned_arrival)
        .execute(&mut **tx)
        .await?;
    }

    Ok(route)
}

/// Fetch a route header by id. `None` is the route store's `not_found`.
pub async fn get_route(pool: &PgPool, route_id: Uuid) -> Result<Option<Route>> {
    let route = sqlx::query_as::<_, Route>(
        "SELECT id, vehicle_id, date, total_distance_km, total_time_min FROM routes WHERE id = $1",
    )
    .bind(route_id)
    .fetch_optional(pool)
    .await?;

    Ok(route)
}

/// Ordered `RouteStop` rows for a route, sequence ascending.
pub async fn get_route_stops(pool: &PgPool, route_id: Uuid) -> Result<Vec<RouteStop>> {
    let stops = sqlx::query_as::<_, RouteStop>(
        r#"
        SELECT route_id, stop_id, sequence, planned_arrival, actual_arrival
        FROM route_stops WHERE route_id = $1 ORDER BY sequence
        "#,
    )
    .bind(route_id)
    .fetch_all(pool)
    .await?;

    Ok(stops)
}

/// The bare `(stop_id, sequence, planned_arrival)` read path for
/// `GET /routes/{route_id}/stops`.
pub async fn get_route_stop_summaries(pool: &PgPool, route_id: Uuid) -> Result<Vec<RouteStopSummary>> {
    let stops = sqlx::query_as::<_, RouteStopSummary>(
        r#"
        SELECT stop_id, sequence, planned_arrival
        FROM route_stops WHERE route_id = $1 ORDER BY sequence
        "#,
    )
    .bind(route_id)
    .fetch_all(pool)
    .await?;

    Ok(stops)
}

/// Stops in sequence order with coordinates and window lower bound, for
/// the rerouter (C6) to rebuild a matrix and walk ETAs.
pub async fn get_route_stops_for_reroute(pool: &PgPool, route_id: Uuid) -> Result<Vec<RerouteStopRow>> {
    let rows = sqlx::query_as::<_, RerouteStopRow>(
        r#"
        SELECT rs.stop_id, rs.sequence, s.lat, s.lng, s.earliest_time
        FROM route_stops rs
        JOIN stops s ON s.id = rs.stop_id
        WHERE rs.route_id = $1
        ORDER BY rs.sequence
        "#,
    )
    .bind(route_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Stops enriched with coordinates and windows for
/// `GET /routes/{route_id}/detail`.
pub async fn get_route_stop_details(pool: &PgPool, route_id: Uuid) -> Result<Vec<RouteStopDetail>> {
    let stops = sqlx::query_as::<_, RouteStopDetail>(
        r#"
        SELECT
            rs.stop_id, rs.sequence, rs.planned_arrival,
            s.lat, s.lng, s.address,
            s.earliest_time::text AS earliest_time,
            s.latest_time::text AS latest_time,
            s.package_weight_kg
        FROM route_stops rs
        JOIN stops s ON s.id = rs.stop_id
        WHERE rs.route_id = $1
        ORDER BY rs.sequence
        "#,
    )
    .bind(route_id)
    .fetch_all(pool)
    .await?;

    Ok(stops)
}
