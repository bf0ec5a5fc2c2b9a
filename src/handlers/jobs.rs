//! Job queue handlers for the async optimization pipeline (C5).
//!
//! Uses NATS JetStream for durable job queuing with:
//! - Job submission and status tracking
//! - Worker pool processing with explicit acknowledgement and retry
//! - Status broadcast on a per-job subject, queryable by id

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_nats::Client;
use async_nats::jetstream::{self, Context as JsContext};
use futures::StreamExt;
use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::queries;
use crate::services::constraints::{time_to_minutes, validate_route, StopRecord};
use crate::services::routing::MatrixProvider;
use crate::services::solver::{score, solve, solve_greedy, Problem, SolvedRoute, VehicleRecord};
use crate::db::queries::route::PlannedStop;
use crate::types::{
    Coordinates, ErrorResponse, JobStatus, JobStatusUpdate, JobSubmitResponse, QueuedJob, Request,
    RoutePlanJobRequest, RoutePlanResult, SuccessResponse,
};

const STREAM_NAME: &str = "ROUTEWEAVE_JOBS";
const CONSUMER_NAME: &str = "route_optimizers";
const SUBJECT_JOBS: &str = "routeweave.jobs.route";
const SUBJECT_STATUS_PREFIX: &str = "routeweave.jobs.status";

/// Shared state for job processing: the JetStream handle, the database
/// pool, the matrix provider (C2), and an in-memory table of the latest
/// status per job so `routeweave.routes.job.status` can answer without a
/// round trip through JetStream.
pub struct JobProcessor {
    client: Client,
    js: JsContext,
    pool: PgPool,
    matrix_provider: Arc<MatrixProvider>,
    pending_count: AtomicU32,
    statuses: Mutex<HashMap<Uuid, JobStatus>>,
}

impl JobProcessor {
    pub async fn new(client: Client, pool: PgPool, matrix_provider: Arc<MatrixProvider>) -> Result<Self> {
        let js = jetstream::new(client.clone());

        let stream_config = jetstream::stream::Config {
            name: STREAM_NAME.to_string(),
            subjects: vec![SUBJECT_JOBS.to_string()],
            max_messages: 10_000,
            max_bytes: 100 * 1024 * 1024,
            retention: jetstream::stream::RetentionPolicy::WorkQueue,
            ..Default::default()
        };

        js.get_or_create_stream(stream_config).await?;
        info!("JetStream stream '{}' ready", STREAM_NAME);

        Ok(Self {
            client,
            js,
            pool,
            matrix_provider,
            pending_count: AtomicU32::new(0),
            statuses: Mutex::new(HashMap::new()),
        })
    }

    /// Enqueue a job onto JetStream and return its id immediately.
    pub async fn submit_job(&self, request: RoutePlanJobRequest) -> Result<JobSubmitResponse> {
        let job = QueuedJob::new(request);
        let job_id = job.id;

        let payload = serde_json::to_vec(&job)?;
        self.js.publish(SUBJECT_JOBS, payload.into()).await?.await?;

        self.pending_count.fetch_add(1, Ordering::Relaxed);
        info!("Job {} submitted", job_id);

        self.set_status(job_id, JobStatus::Queued).await?;

        Ok(JobSubmitResponse { job_id })
    }

    /// Current status of a job, as last recorded by this process. `None`
    /// if the id is unknown to this worker (it may have been handled by
    /// a different replica — spec.md §9 leaves cross-replica status
    /// lookup out of scope).
    pub fn get_status(&self, job_id: Uuid) -> Option<JobStatus> {
        self.statuses.lock().unwrap().get(&job_id).cloned()
    }

    async fn set_status(&self, job_id: Uuid, status: JobStatus) -> Result<()> {
        self.statuses.lock().unwrap().insert(job_id, status.clone());

        let update = JobStatusUpdate::new(job_id, status);
        let subject = format!("{}.{}", SUBJECT_STATUS_PREFIX, job_id);
        let payload = serde_json::to_vec(&update)?;
        self.client.publish(subject, payload.into()).await?;
        Ok(())
    }

    /// Pull-consume jobs from the stream, one spawned task per delivery.
    pub async fn start_processing(self: Arc<Self>) -> Result<()> {
        let stream = self.js.get_stream(STREAM_NAME).await?;

        let consumer_config = jetstream::consumer::pull::Config {
            durable_name: Some(CONSUMER_NAME.to_string()),
            ack_policy: jetstream::consumer::AckPolicy::Explicit,
            max_deliver: 3,
            ..Default::default()
        };

        let consumer = stream.get_or_create_consumer(CONSUMER_NAME, consumer_config).await?;
        info!("JetStream consumer '{}' ready", CONSUMER_NAME);

        let mut messages = consumer.messages().await?;

        while let Some(msg) = messages.next().await {
            match msg {
                Ok(msg) => {
                    let processor = Arc::clone(&self);
                    tokio::spawn(async move {
                        if let Err(e) = processor.process_job(msg).await {
                            error!("Failed to process job: {}", e);
                        }
                    });
                }
                Err(e) => error!("Error receiving message: {}", e),
            }
        }

        Ok(())
    }

    async fn process_job(&self, msg: jetstream::Message) -> Result<()> {
        let job: QueuedJob = serde_json::from_slice(&msg.payload)?;
        let job_id = job.id;

        info!("Processing job {}", job_id);
        self.pending_count.fetch_sub(1, Ordering::Relaxed);
        self.set_status(job_id, JobStatus::Started).await?;

        match self.execute_route_plan(&job.request).await {
            Ok(result) => {
                self.set_status(job_id, JobStatus::Done { result }).await?;
                if let Err(e) = msg.ack().await {
                    error!("Failed to ack job {}: {:?}", job_id, e);
                }
                info!("Job {} completed successfully", job_id);
            }
            Err(e) => {
                self.set_status(job_id, JobStatus::Failed { error: e.to_string() }).await?;
                warn!("Job {} failed: {}", job_id, e);
            }
        }

        Ok(())
    }

    /// Run the C2→C3→C4 pipeline for one job: load the depot, fleet, and
    /// stop batch; build matrices; solve greedy and 2-opt; persist every
    /// produced route; report the improvement over the greedy baseline.
    async fn execute_route_plan(&self, request: &RoutePlanJobRequest) -> Result<RoutePlanResult> {
        let depot = queries::depot::get_depot(&self.pool, request.depot_id)
            .await?
            .context("depot not found")?;

        let vehicles_db = queries::vehicle::list_vehicles_by_ids(&self.pool, &request.vehicle_ids).await?;
        if vehicles_db.is_empty() {
            anyhow::bail!("no vehicles found");
        }

        let stops_db = queries::stop::list_stops_by_ids(&self.pool, &request.stop_ids).await?;
        if stops_db.is_empty() {
            anyhow::bail!("no stops found");
        }

        let mut coords = vec![Coordinates::new(depot.lat, depot.lng)];
        coords.extend(stops_db.iter().map(|s| Coordinates::new(s.lat, s.lng)));

        let (dist, time) = self.matrix_provider.build_matrices(&coords).await;

        let stop_records: Vec<StopRecord> = stops_db
            .iter()
            .enumerate()
            .map(|(i, s)| StopRecord {
                matrix_index: i + 1,
                weight: s.package_weight_kg,
                earliest_min: time_to_minutes(s.earliest_time),
                latest_min: time_to_minutes(s.latest_time),
            })
            .collect();

        let vehicle_records: Vec<VehicleRecord> = vehicles_db
            .iter()
            .map(|v| VehicleRecord { capacity_kg: v.capacity_kg, driver: v.driver_name.clone() })
            .collect();

        let problem = Problem::new(
            stop_records,
            vehicle_records,
            dist,
            time,
            0,
            crate::defaults::DEFAULT_DISPATCH_MIN,
        );

        let greedy_routes = solve_greedy(&problem);
        let greedy_score = score(&problem, &greedy_routes);

        let routes = solve(&problem);
        let final_score = score(&problem, &routes);

        // One transaction for the whole job: every route header and its
        // stops are inserted against it, committed once at the end
        // (spec.md §4.4 "Commit once at the end of a job").
        let mut tx = self.pool.begin().await?;
        let mut route_ids = Vec::with_capacity(routes.len());
        for route in &routes {
            let route_id =
                self.persist_route(&mut tx, &problem, &vehicles_db, &stops_db, route, request.date).await?;
            route_ids.push(route_id);
        }
        tx.commit().await?;

        let greedy_total = greedy_score.total_distance_km;
        let optimized_total = final_score.total_distance_km;
        let improvement_pct = if greedy_total == 0.0 {
            0.0
        } else {
            round_to((greedy_total - optimized_total) / greedy_total * 100.0, 2)
        };

        Ok(RoutePlanResult {
            route_ids,
            total_distance_km: optimized_total,
            greedy_distance_km: greedy_total,
            improvement_pct,
            num_routes: final_score.num_routes,
            score: final_score,
        })
    }

    async fn persist_route(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        problem: &Problem,
        vehicles_db: &[crate::types::Vehicle],
        stops_db: &[crate::types::Stop],
        route: &SolvedRoute,
        date: chrono::NaiveDate,
    ) -> Result<Uuid> {
        let vehicle = &vehicles_db[route.vehicle_index];
        let stop_refs: Vec<StopRecord> = route.stops.iter().map(|&i| problem.stops[i]).collect();
        let (_valid, arrivals) =
            validate_route(&stop_refs, vehicle.capacity_kg, &problem.time, problem.depot_idx, problem.dispatch_min);

        let planned: Vec<PlannedStop> = route
            .stops
            .iter()
            .enumerate()
            .map(|(seq, &idx)| PlannedStop {
                stop_id: stops_db[idx].id,
                sequence: seq as i32,
                planned_arrival: arrivals.get(seq).map(|&m| format_minutes(m)),
            })
            .collect();

        let total_time_min = route_time_min(problem, &route.stops);

        let persisted = queries::route::insert_route_with_stops(
            tx,
            vehicle.id,
            date,
            round_to(route.dist, 3),
            round_to(total_time_min, 1),
            &planned,
        )
        .await?;

        Ok(persisted.id)
    }
}

/// Closed-loop travel time (depot → stops → depot) for a stop ordering,
/// mirroring `Problem::route_dist` but walking the time matrix.
fn route_time_min(problem: &Problem, stop_indices: &[usize]) -> f64 {
    let Some(&first) = stop_indices.first() else {
        return 0.0;
    };

    let mut t = problem.time[problem.depot_idx][problem.stops[first].matrix_index];
    for w in stop_indices.windows(2) {
        let a = problem.stops[w[0]].matrix_index;
        let b = problem.stops[w[1]].matrix_index;
        t += problem.time[a][b];
    }
    let last = problem.stops[*stop_indices.last().unwrap()].matrix_index;
    t += problem.time[last][problem.depot_idx];
    t
}

/// Minutes-since-midnight to `HH:MM`, truncated not rounded — same
/// convention as the rerouter's ETA formatting.
fn format_minutes(arrival: f64) -> String {
    let h = (arrival as i64).div_euclid(60);
    let m = (arrival as i64).rem_euclid(60);
    format!("{:02}:{:02}", h, m)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Handle `routeweave.routes.optimize.submit` requests (C5 `submit`).
pub async fn handle_job_submit(
    client: Client,
    mut subscriber: async_nats::Subscriber,
    processor: Arc<JobProcessor>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<RoutePlanJobRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse job submit request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match processor.submit_job(request.payload).await {
            Ok(response) => {
                let success = SuccessResponse::new(request.id, response);
                let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
            }
            Err(e) => {
                error!("Failed to submit job: {}", e);
                let error = ErrorResponse::new(request.id, "SUBMIT_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle `routeweave.routes.job.status` requests (C5 `status`).
pub async fn handle_job_status(
    client: Client,
    mut subscriber: async_nats::Subscriber,
    processor: Arc<JobProcessor>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<Uuid> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse job status request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match processor.get_status(request.payload) {
            Some(status) => {
                let success = SuccessResponse::new(request.id, status);
                let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
            }
            None => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "job not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes_truncates() {
        assert_eq!(format_minutes(490.9), "08:10");
    }

    #[test]
    fn test_round_to_three_decimals() {
        assert_eq!(round_to(1.23456, 3), 1.235);
    }

    #[test]
    fn test_stream_config_values() {
        assert_eq!(STREAM_NAME, "ROUTEWEAVE_JOBS");
        assert_eq!(SUBJECT_JOBS, "routeweave.jobs.route");
        assert!(SUBJECT_STATUS_PREFIX.starts_with("routeweave.jobs.status"));
    }

    #[test]
    fn test_route_time_min_empty_is_zero() {
        let problem = Problem::new(vec![], vec![], vec![vec![0.0]], vec![vec![0.0]], 0, 480.0);
        assert_eq!(route_time_min(&problem, &[]), 0.0);
    }
}
