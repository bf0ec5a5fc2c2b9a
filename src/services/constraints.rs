//! Constraint checker (C1) — time-window and capacity predicates.
//!
//! Pure numeric predicates shared by the solver's greedy construction,
//! its 2-opt feasibility re-check, and the rerouter. None of these
//! functions perform I/O or raise; infeasibility is a return value.

use chrono::NaiveTime;

/// Convert a local time-of-day into minutes since midnight (float, so a
/// `:SS` component contributes a fraction).
pub fn time_to_minutes(t: NaiveTime) -> f64 {
    use chrono::Timelike;
    t.hour() as f64 * 60.0 + t.minute() as f64 + t.second() as f64 / 60.0
}

/// `true` if the total of `weights` does not exceed `capacity`.
pub fn capacity_ok(weights: &[f64], capacity: f64) -> bool {
    weights.iter().sum::<f64>() <= capacity
}

/// `true` if `arrival_min` falls within `[earliest, latest]`, inclusive.
pub fn window_ok(arrival_min: f64, earliest: f64, latest: f64) -> bool {
    arrival_min >= earliest && arrival_min <= latest
}

/// A stop as seen by the constraint checker and solver: its position in
/// the distance/time matrix plus its weight and window, in minutes.
#[derive(Debug, Clone, Copy)]
pub struct StopRecord {
    pub matrix_index: usize,
    pub weight: f64,
    pub earliest_min: f64,
    pub latest_min: f64,
}

/// Walk `stops` in order from `depot_idx` at `dispatch_min`, checking
/// capacity up front and the time window at every stop. Returns the raw
/// arrival-time vector (pre-wait) on success; an empty vector means
/// infeasible. The depot-return leg is never validated against a window.
pub fn validate_route(
    stops: &[StopRecord],
    vehicle_capacity: f64,
    time_matrix: &[Vec<f64>],
    depot_idx: usize,
    dispatch_min: f64,
) -> (bool, Vec<f64>) {
    let weights: Vec<f64> = stops.iter().map(|s| s.weight).collect();
    if !capacity_ok(&weights, vehicle_capacity) {
        return (false, Vec::new());
    }

    let mut arrivals = Vec::with_capacity(stops.len());
    let mut t = dispatch_min;
    let mut p = depot_idx;

    for stop in stops {
        let travel = time_matrix[p][stop.matrix_index];
        let arrival = t + travel;

        if arrival > stop.latest_min {
            return (false, Vec::new());
        }

        arrivals.push(arrival);
        t = arrival.max(stop.earliest_min);
        p = stop.matrix_index;
    }

    (true, arrivals)
}
