//! OpenRouteService Matrix API client — the primary distance-matrix
//! provider (C2).
//!
//! https://openrouteservice.org/dev/#/api-docs/v2/matrix/{profile}/post

use async_trait::async_trait;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Coordinates;

use super::MatrixSource;

const MATRIX_URL: &str = "https://api.openrouteservice.org/v2/matrix/driving-car";
const TIMEOUT_SECS: u64 = 30;

pub struct OrsClient {
    client: Client,
    api_key: String,
}

impl OrsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(TIMEOUT_SECS))
            .build()
            .expect("failed to build reqwest client");

        Self { client, api_key: api_key.into() }
    }
}

#[derive(Debug, Serialize)]
struct MatrixRequest {
    locations: Vec<[f64; 2]>,
    metrics: Vec<&'static str>,
    units: &'static str,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    distances: Vec<Vec<f64>>,
    durations: Vec<Vec<f64>>,
}

#[async_trait]
impl MatrixSource for OrsClient {
    async fn fetch(&self, coords: &[Coordinates]) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
        // ORS expects [lng, lat] ordering, depot-first.
        let locations: Vec<[f64; 2]> = coords.iter().map(|c| [c.lng, c.lat]).collect();

        let request = MatrixRequest {
            locations,
            metrics: vec!["distance", "duration"],
            units: "km",
        };

        debug!("requesting {}x{} matrix from OpenRouteService", coords.len(), coords.len());

        let response = self
            .client
            .post(MATRIX_URL)
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("ORS matrix request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("ORS matrix returned {}: {}", status, body);
        }

        let body: MatrixResponse = response
            .json()
            .await
            .context("failed to parse ORS matrix response")?;

        let distances_km = body.distances;
        let time_min: Vec<Vec<f64>> = body
            .durations
            .into_iter()
            .map(|row| row.into_iter().map(|s| s / 60.0).collect())
            .collect();

        Ok((distances_km, time_min))
    }

    fn name(&self) -> &str {
        "openrouteservice"
    }
}
