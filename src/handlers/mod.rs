//! NATS message handlers

pub mod jobs;
pub mod resources;
pub mod route;

use std::sync::Arc;

use anyhow::Result;
use async_nats::Client;
use futures::FutureExt;
use sqlx::PgPool;
use tracing::error;

use crate::config::Config;
use crate::services::routing::MatrixProvider;
use jobs::JobProcessor;

/// Subscribe every handler to its subject, spawn each as its own task, and
/// block until one of them exits — which only happens on an unrecoverable
/// transport error, since every handler loop runs until its subscription
/// closes.
pub async fn start_handlers(client: Client, pool: PgPool, config: &Config) -> Result<()> {
    let matrix_provider = Arc::new(MatrixProvider::new(config));

    let processor = Arc::new(JobProcessor::new(client.clone(), pool.clone(), Arc::clone(&matrix_provider)).await?);
    let processing_handle = tokio::spawn({
        let processor = Arc::clone(&processor);
        async move {
            if let Err(e) = processor.start_processing().await {
                error!("Job processing loop exited: {}", e);
            }
        }
    });

    let job_submit_sub = client.subscribe("routeweave.routes.optimize.submit").await?;
    let job_submit_handle = tokio::spawn({
        let client = client.clone();
        let processor = Arc::clone(&processor);
        async move {
            if let Err(e) = jobs::handle_job_submit(client, job_submit_sub, processor).await {
                error!("job submit handler exited: {}", e);
            }
        }
    });

    let job_status_sub = client.subscribe("routeweave.routes.job.status").await?;
    let job_status_handle = tokio::spawn({
        let client = client.clone();
        let processor = Arc::clone(&processor);
        async move {
            if let Err(e) = jobs::handle_job_status(client, job_status_sub, processor).await {
                error!("job status handler exited: {}", e);
            }
        }
    });

    let stops_sub = client.subscribe("routeweave.routes.stops").await?;
    let stops_handle = tokio::spawn({
        let client = client.clone();
        let pool = pool.clone();
        async move {
            if let Err(e) = route::handle_stops(client, stops_sub, pool).await {
                error!("routes.stops handler exited: {}", e);
            }
        }
    });

    let detail_sub = client.subscribe("routeweave.routes.detail").await?;
    let detail_handle = tokio::spawn({
        let client = client.clone();
        let pool = pool.clone();
        async move {
            if let Err(e) = route::handle_detail(client, detail_sub, pool).await {
                error!("routes.detail handler exited: {}", e);
            }
        }
    });

    let reroute_sub = client.subscribe("routeweave.routes.reroute").await?;
    let reroute_handle = tokio::spawn({
        let client = client.clone();
        let pool = pool.clone();
        let matrix_provider = Arc::clone(&matrix_provider);
        async move {
            if let Err(e) = route::handle_reroute(client, reroute_sub, pool, matrix_provider).await {
                error!("routes.reroute handler exited: {}", e);
            }
        }
    });

    let subscribe_sub = client.subscribe("routeweave.routes.subscribe").await?;
    let subscribe_handle = tokio::spawn({
        let client = client.clone();
        async move {
            if let Err(e) = route::handle_subscribe(client, subscribe_sub).await {
                error!("routes.subscribe handler exited: {}", e);
            }
        }
    });

    let unsubscribe_sub = client.subscribe("routeweave.routes.unsubscribe").await?;
    let unsubscribe_handle = tokio::spawn({
        let client = client.clone();
        async move {
            if let Err(e) = route::handle_unsubscribe(client, unsubscribe_sub).await {
                error!("routes.unsubscribe handler exited: {}", e);
            }
        }
    });

    let depot_create_sub = client.subscribe("routeweave.depots.create").await?;
    let depot_create_handle = tokio::spawn({
        let client = client.clone();
        let pool = pool.clone();
        async move {
            if let Err(e) = resources::handle_depot_create(client, depot_create_sub, pool).await {
                error!("depots.create handler exited: {}", e);
            }
        }
    });

    let vehicle_create_sub = client.subscribe("routeweave.vehicles.create").await?;
    let vehicle_create_handle = tokio::spawn({
        let client = client.clone();
        let pool = pool.clone();
        async move {
            if let Err(e) = resources::handle_vehicle_create(client, vehicle_create_sub, pool).await {
                error!("vehicles.create handler exited: {}", e);
            }
        }
    });

    let vehicle_list_sub = client.subscribe("routeweave.vehicles.list").await?;
    let vehicle_list_handle = tokio::spawn({
        let client = client.clone();
        let pool = pool.clone();
        async move {
            if let Err(e) = resources::handle_vehicle_list(client, vehicle_list_sub, pool).await {
                error!("vehicles.list handler exited: {}", e);
            }
        }
    });

    let vehicle_get_sub = client.subscribe("routeweave.vehicles.get").await?;
    let vehicle_get_handle = tokio::spawn({
        let client = client.clone();
        let pool = pool.clone();
        async move {
            if let Err(e) = resources::handle_vehicle_get(client, vehicle_get_sub, pool).await {
                error!("vehicles.get handler exited: {}", e);
            }
        }
    });

    let stop_create_sub = client.subscribe("routeweave.stops.create").await?;
    let stop_create_handle = tokio::spawn({
        let client = client.clone();
        let pool = pool.clone();
        async move {
            if let Err(e) = resources::handle_stop_create(client, stop_create_sub, pool).await {
                error!("stops.create handler exited: {}", e);
            }
        }
    });

    let stop_list_sub = client.subscribe("routeweave.stops.list").await?;
    let stop_list_handle = tokio::spawn({
        let client = client.clone();
        let pool = pool.clone();
        async move {
            if let Err(e) = resources::handle_stop_list(client, stop_list_sub, pool).await {
                error!("stops.list handler exited: {}", e);
            }
        }
    });

    let stop_get_sub = client.subscribe("routeweave.stops.get").await?;
    let stop_get_handle = tokio::spawn({
        let client = client.clone();
        let pool = pool.clone();
        async move {
            if let Err(e) = resources::handle_stop_get(client, stop_get_sub, pool).await {
                error!("stops.get handler exited: {}", e);
            }
        }
    });

    let handles = vec![
        processing_handle.boxed(),
        job_submit_handle.boxed(),
        job_status_handle.boxed(),
        stops_handle.boxed(),
        detail_handle.boxed(),
        reroute_handle.boxed(),
        subscribe_handle.boxed(),
        unsubscribe_handle.boxed(),
        depot_create_handle.boxed(),
        vehicle_create_handle.boxed(),
        vehicle_list_handle.boxed(),
        vehicle_get_handle.boxed(),
        stop_create_handle.boxed(),
        stop_list_handle.boxed(),
        stop_get_handle.boxed(),
    ];

    let (result, _index, _remaining) = futures::future::select_all(handles).await;
    error!("A handler finished unexpectedly: {:?}", result);

    Ok(())
}
