//! Phase 1 — greedy nearest-neighbour multi-vehicle construction.

use super::problem::{Problem, SolvedRoute};

/// Build one route per vehicle (input order), each extended by the closest
/// feasible unassigned stop until none remains reachable. Stops left
/// unassigned after every vehicle has run are simply dropped; callers see
/// this through `Problem::stops.len()` minus the sum of route lengths.
pub fn greedy_construct(problem: &Problem) -> Vec<SolvedRoute> {
    let mut unassigned: Vec<usize> = (0..problem.stops.len()).collect();
    let mut routes = Vec::new();

    for (vehicle_index, vehicle) in problem.vehicles.iter().enumerate() {
        if unassigned.is_empty() {
            break;
        }

        let mut route_stops: Vec<usize> = Vec::new();
        let mut load = 0.0;
        let mut t = problem.dispatch_min;
        let mut p = problem.depot_idx;

        loop {
            let mut best: Option<(usize, f64)> = None;

            for (pos, &i) in unassigned.iter().enumerate() {
                let s = &problem.stops[i];

                if load + s.weight > vehicle.capacity_kg {
                    continue;
                }

                let travel = problem.time[p][s.matrix_index];
                if t + travel > s.latest_min {
                    continue;
                }

                let d = problem.dist[p][s.matrix_index];
                match best {
                    Some((_, best_d)) if d >= best_d => {}
                    _ => best = Some((pos, d)),
                }
            }

            let Some((pos, _)) = best else {
                break;
            };

            let i = unassigned.remove(pos);
            let s = &problem.stops[i];
            let travel = problem.time[p][s.matrix_index];
            t = (t + travel).max(s.earliest_min);
            load += s.weight;
            p = s.matrix_index;
            route_stops.push(i);
        }

        if !route_stops.is_empty() {
            let dist = problem.route_dist(&route_stops);
            routes.push(SolvedRoute { vehicle_index, stops: route_stops, dist });
        }
    }

    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::constraints::StopRecord;
    use crate::services::solver::problem::VehicleRecord;

    fn linear_matrix() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![1.0, 0.0, 1.0, 2.0, 3.0],
            vec![2.0, 1.0, 0.0, 1.0, 2.0],
            vec![3.0, 2.0, 1.0, 0.0, 1.0],
            vec![4.0, 3.0, 2.0, 1.0, 0.0],
        ]
    }

    /// S1: one vehicle, capacity 500, four stops of weight 10 each, all
    /// windows [480, 840] — expect all four assigned to a single route.
    #[test]
    fn test_greedy_s1_single_route_all_assigned() {
        let dist = linear_matrix();
        let time = dist.clone();
        let stops = vec![
            StopRecord { matrix_index: 1, weight: 10.0, earliest_min: 480.0, latest_min: 840.0 },
            StopRecord { matrix_index: 2, weight: 10.0, earliest_min: 480.0, latest_min: 840.0 },
            StopRecord { matrix_index: 3, weight: 10.0, earliest_min: 480.0, latest_min: 840.0 },
            StopRecord { matrix_index: 4, weight: 10.0, earliest_min: 480.0, latest_min: 840.0 },
        ];
        let vehicles = vec![VehicleRecord { capacity_kg: 500.0, driver: "A".into() }];
        let problem = Problem::new(stops, vehicles, dist, time, 0, 480.0);

        let routes = greedy_construct(&problem);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].stops.len(), 4);
        assert_eq!(routes[0].dist, 8.0);
    }

    /// S2: single over-capacity stop produces no routes at all.
    #[test]
    fn test_greedy_s2_over_capacity_no_routes() {
        let dist = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let time = dist.clone();
        let stops = vec![StopRecord { matrix_index: 1, weight: 110.0, earliest_min: 0.0, latest_min: 1440.0 }];
        let vehicles = vec![VehicleRecord { capacity_kg: 100.0, driver: "A".into() }];
        let problem = Problem::new(stops, vehicles, dist, time, 0, 480.0);

        let routes = greedy_construct(&problem);
        assert!(routes.is_empty());
    }

    /// S3: impossible time window produces no routes.
    #[test]
    fn test_greedy_s3_impossible_window_no_routes() {
        let dist = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let time = dist.clone();
        let stops = vec![StopRecord { matrix_index: 1, weight: 5.0, earliest_min: 0.0, latest_min: 480.0 }];
        let vehicles = vec![VehicleRecord { capacity_kg: 100.0, driver: "A".into() }];
        let problem = Problem::new(stops, vehicles, dist, time, 0, 480.0);

        let routes = greedy_construct(&problem);
        assert!(routes.is_empty());
    }

    #[test]
    fn test_greedy_splits_across_vehicles_when_capacity_forces_it() {
        let dist = linear_matrix();
        let time = dist.clone();
        let stops = vec![
            StopRecord { matrix_index: 1, weight: 60.0, earliest_min: 480.0, latest_min: 1440.0 },
            StopRecord { matrix_index: 2, weight: 60.0, earliest_min: 480.0, latest_min: 1440.0 },
        ];
        let vehicles = vec![
            VehicleRecord { capacity_kg: 60.0, driver: "A".into() },
            VehicleRecord { capacity_kg: 60.0, driver: "B".into() },
        ];
        let problem = Problem::new(stops, vehicles, dist, time, 0, 480.0);

        let routes = greedy_construct(&problem);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].stops, vec![0]);
        assert_eq!(routes[1].stops, vec![1]);
    }

    #[test]
    fn test_greedy_tie_break_first_encountered_wins() {
        // Two unassigned stops equidistant from the depot; input order
        // must decide, not any secondary ordering.
        let dist = vec![
            vec![0.0, 5.0, 5.0],
            vec![5.0, 0.0, 1.0],
            vec![5.0, 1.0, 0.0],
        ];
        let time = dist.clone();
        let stops = vec![
            StopRecord { matrix_index: 1, weight: 1.0, earliest_min: 0.0, latest_min: 1440.0 },
            StopRecord { matrix_index: 2, weight: 1.0, earliest_min: 0.0, latest_min: 1440.0 },
        ];
        let vehicles = vec![VehicleRecord { capacity_kg: 100.0, driver: "A".into() }];
        let problem = Problem::new(stops, vehicles, dist, time, 0, 480.0);

        let routes = greedy_construct(&problem);
        assert_eq!(routes[0].stops[0], 0, "first-encountered candidate must win on tied distance");
    }

    #[test]
    fn test_greedy_leaves_unreachable_stop_unassigned() {
        let dist = linear_matrix();
        let time = dist.clone();
        let stops = vec![
            StopRecord { matrix_index: 1, weight: 10.0, earliest_min: 480.0, latest_min: 840.0 },
            // Unreachable: arrival would be 480 + 4 = 484 > latest 481.
            StopRecord { matrix_index: 4, weight: 10.0, earliest_min: 0.0, latest_min: 481.0 },
        ];
        let vehicles = vec![VehicleRecord { capacity_kg: 500.0, driver: "A".into() }];
        let problem = Problem::new(stops, vehicles, dist, time, 0, 480.0);

        let routes = greedy_construct(&problem);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].stops, vec![0]);
    }
}
