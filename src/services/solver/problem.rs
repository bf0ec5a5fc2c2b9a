//! Shared solver data structures (C3) — not persisted, in-memory only for
//! the duration of one `solve()` call.

use crate::services::constraints::{self, StopRecord};

/// A vehicle as seen by the solver: capacity and driver display name.
/// Input order determines greedy-construction order (spec.md §4.3).
#[derive(Debug, Clone)]
pub struct VehicleRecord {
    pub capacity_kg: f64,
    pub driver: String,
}

/// One constructed (and possibly 2-opt-improved) vehicle route: the
/// vehicle's index into `Problem::vehicles`, the ordered stop indices
/// (into `Problem::stops`), and its total closed-loop distance.
#[derive(Debug, Clone)]
pub struct SolvedRoute {
    pub vehicle_index: usize,
    pub stops: Vec<usize>,
    pub dist: f64,
}

/// The full input to one solver invocation: precomputed matrices, the
/// stop list, the vehicle list, the depot's matrix index, and the
/// dispatch clock. Stateless and reusable across calls.
pub struct Problem {
    pub stops: Vec<StopRecord>,
    pub vehicles: Vec<VehicleRecord>,
    pub dist: Vec<Vec<f64>>,
    pub time: Vec<Vec<f64>>,
    pub depot_idx: usize,
    pub dispatch_min: f64,
}

impl Problem {
    pub fn new(
        stops: Vec<StopRecord>,
        vehicles: Vec<VehicleRecord>,
        dist: Vec<Vec<f64>>,
        time: Vec<Vec<f64>>,
        depot_idx: usize,
        dispatch_min: f64,
    ) -> Self {
        Self { stops, vehicles, dist, time, depot_idx, dispatch_min }
    }

    /// Total closed-loop distance of a stop-index ordering: depot → first
    /// → ... → last → depot. Empty ordering is zero distance.
    pub fn route_dist(&self, stop_indices: &[usize]) -> f64 {
        let Some(&first) = stop_indices.first() else {
            return 0.0;
        };

        let mut d = self.dist[self.depot_idx][self.stops[first].matrix_index];
        for w in stop_indices.windows(2) {
            let a = self.stops[w[0]].matrix_index;
            let b = self.stops[w[1]].matrix_index;
            d += self.dist[a][b];
        }
        let last = self.stops[*stop_indices.last().unwrap()].matrix_index;
        d += self.dist[last][self.depot_idx];
        d
    }

    /// Capacity and time-window feasibility of a candidate stop ordering
    /// for the given vehicle. Used by 2-opt to re-check every accepted move.
    /// Delegates to the same `validate_route` predicate route construction
    /// and persistence use — there is only one feasibility rule.
    pub fn feasible(&self, stop_indices: &[usize], vehicle: &VehicleRecord) -> bool {
        let candidate: Vec<StopRecord> = stop_indices.iter().map(|&i| self.stops[i]).collect();
        let (valid, _arrivals) =
            constraints::validate_route(&candidate, vehicle.capacity_kg, &self.time, self.depot_idx, self.dispatch_min);
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_problem() -> Problem {
        let dist = vec![
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![1.0, 0.0, 1.0, 2.0, 3.0],
            vec![2.0, 1.0, 0.0, 1.0, 2.0],
            vec![3.0, 2.0, 1.0, 0.0, 1.0],
            vec![4.0, 3.0, 2.0, 1.0, 0.0],
        ];
        let time = dist.clone();
        let stops = vec![
            StopRecord { matrix_index: 1, weight: 10.0, earliest_min: 480.0, latest_min: 840.0 },
            StopRecord { matrix_index: 2, weight: 10.0, earliest_min: 480.0, latest_min: 840.0 },
            StopRecord { matrix_index: 3, weight: 10.0, earliest_min: 480.0, latest_min: 840.0 },
            StopRecord { matrix_index: 4, weight: 10.0, earliest_min: 480.0, latest_min: 840.0 },
        ];
        let vehicles = vec![VehicleRecord { capacity_kg: 500.0, driver: "A".into() }];
        Problem::new(stops, vehicles, dist, time, 0, 480.0)
    }

    #[test]
    fn test_route_dist_empty() {
        let p = linear_problem();
        assert_eq!(p.route_dist(&[]), 0.0);
    }

    /// S1: depot→1→2→3→4→depot over the linear matrix is 1+1+1+1+4=8.
    #[test]
    fn test_route_dist_s1_linear() {
        let p = linear_problem();
        assert_eq!(p.route_dist(&[0, 1, 2, 3]), 8.0);
    }

    #[test]
    fn test_feasible_true_for_well_formed_order() {
        let p = linear_problem();
        assert!(p.feasible(&[0, 1, 2, 3], &p.vehicles[0]));
    }

    #[test]
    fn test_feasible_false_over_capacity() {
        let p = linear_problem();
        let tiny = VehicleRecord { capacity_kg: 5.0, driver: "B".into() };
        assert!(!p.feasible(&[0, 1, 2, 3], &tiny));
    }
}
