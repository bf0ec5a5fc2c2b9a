//! Great-circle geometry — the zero-dependency fallback matrix provider (C2).
//!
//! Used whenever no OpenRouteService key is configured, or when the primary
//! provider fails. Distances are plain haversine; travel time is derived
//! from a single average-speed assumption. No road-network topology.

use crate::defaults::{DEFAULT_AVG_SPEED_KMH, EARTH_RADIUS_KM};
use crate::types::Coordinates;

/// Haversine distance between two points, in kilometers.
pub fn haversine_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Estimated travel time in minutes, assuming a constant average speed.
pub fn travel_time_minutes(from: &Coordinates, to: &Coordinates, avg_speed_kmh: f64) -> f64 {
    (haversine_distance(from, to) / avg_speed_kmh) * 60.0
}

/// Build the NxN (distance_km, time_min) matrices for `coords[0]` = depot,
/// `coords[1..]` = stops, using great-circle geometry and a fixed average
/// speed. Diagonal entries are exactly zero.
pub fn haversine_matrices(
    coords: &[Coordinates],
    avg_speed_kmh: f64,
) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let n = coords.len();
    let mut dist = vec![vec![0.0; n]; n];
    let mut time = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..n {
            if i != j {
                dist[i][j] = haversine_distance(&coords[i], &coords[j]);
                time[i][j] = travel_time_minutes(&coords[i], &coords[j], avg_speed_kmh);
            }
        }
    }

    (dist, time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seattle() -> Coordinates {
        Coordinates::new(47.6062, -122.3321)
    }

    fn seattle_north() -> Coordinates {
        Coordinates::new(47.6242, -122.3321)
    }

    #[test]
    fn test_haversine_prague_brno() {
        let prague = Coordinates::new(50.0755, 14.4378);
        let brno = Coordinates::new(49.1951, 16.6068);

        let distance = haversine_distance(&prague, &brno);

        // Prague to Brno is approximately 185 km
        assert!((distance - 185.0).abs() < 5.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinates::new(50.0, 14.0);
        let distance = haversine_distance(&point, &point);
        assert!((distance - 0.0).abs() < 1e-9);
    }

    /// S5: fallback distance between two nearby Seattle points should land
    /// in the 1.8-2.2 km band the spec's concrete scenario specifies.
    #[test]
    fn test_haversine_seattle_scenario_s5() {
        let distance = haversine_distance(&seattle(), &seattle_north());
        assert!(distance > 1.8 && distance < 2.2, "got {distance} km");
    }

    /// Invariant 3: time is exactly proportional to distance under the
    /// fallback, within relative 1e-6.
    #[test]
    fn test_time_proportional_to_distance() {
        let d = haversine_distance(&seattle(), &seattle_north());
        let t = travel_time_minutes(&seattle(), &seattle_north(), DEFAULT_AVG_SPEED_KMH);
        let expected = d / DEFAULT_AVG_SPEED_KMH * 60.0;
        assert!(((t - expected) / expected).abs() < 1e-6);
    }

    /// Invariant 1 & 2: zero diagonal and symmetry.
    #[test]
    fn test_haversine_matrices_zero_diagonal_and_symmetric() {
        let coords = vec![seattle(), seattle_north(), Coordinates::new(47.6, -122.35)];
        let (dist, time) = haversine_matrices(&coords, DEFAULT_AVG_SPEED_KMH);

        for i in 0..coords.len() {
            assert!((dist[i][i] - 0.0).abs() < 1e-9);
            assert!((time[i][i] - 0.0).abs() < 1e-9);
        }

        for i in 0..coords.len() {
            for j in 0..coords.len() {
                assert!((dist[i][j] - dist[j][i]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_haversine_matrices_empty() {
        let (dist, time) = haversine_matrices(&[], DEFAULT_AVG_SPEED_KMH);
        assert!(dist.is_empty());
        assert!(time.is_empty());
    }
}
