//! Distance-matrix provider (C2) — primary road-network API with a
//! great-circle fallback. The fallback is never surfaced as an error to
//! callers: any transport failure, non-2xx response, or parse failure is
//! caught, logged at warning level, and the haversine matrices are
//! returned instead (spec.md §4.2, §7 "Provider unavailable").

pub mod ors;

pub use ors::OrsClient;

use async_trait::async_trait;
use anyhow::Result;
use tracing::warn;

use crate::config::Config;
use crate::defaults::DEFAULT_AVG_SPEED_KMH;
use crate::types::Coordinates;

use super::geo;

/// A source of real-world distance/time matrices. Implemented by the ORS
/// client; mockable for tests that need to exercise the fallback path.
#[async_trait]
pub trait MatrixSource: Send + Sync {
    /// Build `(distance_km, time_min)` matrices for `coords[0]` = depot,
    /// `coords[1..]` = stops.
    async fn fetch(&self, coords: &[Coordinates]) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>)>;

    fn name(&self) -> &str;
}

/// Selects and drives the primary/fallback matrix providers per spec.md
/// §4.2: a configured API key tries the primary and falls back on any
/// failure; no key skips straight to the haversine fallback.
pub struct MatrixProvider {
    primary: Option<Box<dyn MatrixSource>>,
}

impl MatrixProvider {
    pub fn new(config: &Config) -> Self {
        let primary = if config.has_ors_key() {
            Some(Box::new(OrsClient::new(config.ors_api_key.clone())) as Box<dyn MatrixSource>)
        } else {
            None
        };
        Self { primary }
    }

    /// Construct directly from a matrix source, bypassing config — used by
    /// tests that need to exercise a specific primary/fallback interaction.
    pub fn with_source(source: Box<dyn MatrixSource>) -> Self {
        Self { primary: Some(source) }
    }

    /// No primary configured — fallback only.
    pub fn fallback_only() -> Self {
        Self { primary: None }
    }

    /// Build `(distance_km, time_min)` matrices for the given coordinates,
    /// depot first. Never fails: falls back to great-circle geometry on
    /// any primary-provider error.
    pub async fn build_matrices(&self, coords: &[Coordinates]) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        if let Some(primary) = &self.primary {
            match primary.fetch(coords).await {
                Ok(matrices) => return matrices,
                Err(e) => {
                    warn!(provider = primary.name(), error = %e, "matrix provider failed, falling back to haversine");
                }
            }
        }

        geo::haversine_matrices(coords, DEFAULT_AVG_SPEED_KMH)
    }
}
