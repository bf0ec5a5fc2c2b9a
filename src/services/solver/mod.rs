//! CVRPTW solver (C3) — two-phase heuristic: greedy nearest-neighbour
//! construction followed by per-route 2-opt local search. Stateless
//! across calls; never raises, infeasibility surfaces through `RouteScore`.

pub mod greedy;
pub mod problem;
pub mod two_opt;

pub use problem::{Problem, SolvedRoute, VehicleRecord};

use crate::types::RouteScore;

/// Phase 1 only — used by the job runner to benchmark the 2-opt
/// improvement against the unoptimised greedy baseline.
pub fn solve_greedy(problem: &Problem) -> Vec<SolvedRoute> {
    greedy::greedy_construct(problem)
}

/// Full solve: greedy construction, then 2-opt improvement per route.
pub fn solve(problem: &Problem) -> Vec<SolvedRoute> {
    solve_greedy(problem)
        .into_iter()
        .map(|route| two_opt::two_opt(problem, &route))
        .collect()
}

/// Aggregate scoring over a solved set of routes, per spec.md §4.3.
pub fn score(problem: &Problem, routes: &[SolvedRoute]) -> RouteScore {
    let total_distance: f64 = routes.iter().map(|r| r.dist).sum();
    let assigned: usize = routes.iter().map(|r| r.stops.len()).sum();
    let num_routes = routes.len();

    RouteScore {
        total_distance_km: round_to(total_distance, 3),
        num_routes,
        avg_stops_per_route: round_to(assigned as f64 / num_routes.max(1) as f64, 1),
        unassigned: problem.stops.len().saturating_sub(assigned),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
