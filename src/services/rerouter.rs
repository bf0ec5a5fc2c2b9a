//! Rerouter (C6) — recomputes ETAs along an unchanged stop sequence after
//! traffic-delay events degrade edge travel times. Never re-orders stops
//! or re-assigns vehicles; pure-CPU and must not raise for domain-level
//! conditions (spec.md §7).

use uuid::Uuid;

use crate::types::{ReroutedStop, RerouteResponse, TrafficEvent};

/// One stop as seen by the rerouter: its matrix index (depot is 0, so the
/// first stop is 1), coordinates, and its window lower bound.
#[derive(Debug, Clone, Copy)]
pub struct RerouteStopInput {
    pub stop_id: Uuid,
    pub sequence: i32,
    pub lat: f64,
    pub lng: f64,
    pub earliest_min: f64,
}

/// Multiply `time_matrix[from_idx][to_idx]` by each event's `delay_factor`.
/// Out-of-range indices are silently skipped (spec.md §4.6 step 3).
pub fn apply_traffic_events(time_matrix: &mut [Vec<f64>], events: &[TrafficEvent]) {
    for event in events {
        if event.from_idx < time_matrix.len() && event.to_idx < time_matrix[event.from_idx].len() {
            time_matrix[event.from_idx][event.to_idx] *= event.delay_factor;
        }
    }
}

/// Walk the (unchanged) stop sequence from the depot at `dispatch_min`,
/// recomputing arrival times against the delayed `time_matrix`. Matrix
/// index `i+1` is stop `i` in the sequence (index 0 reserved for depot).
///
/// `dispatch_min` intentionally defaults to the solver's fixed dispatch
/// time rather than the route's actual departure — spec.md §9 flags this
/// as an open question and preserves the existing behaviour.
pub fn recompute_etas(
    route_id: Uuid,
    stops: &[RerouteStopInput],
    time_matrix: &[Vec<f64>],
    depot_idx: usize,
    dispatch_min: f64,
) -> RerouteResponse {
    let mut t = dispatch_min;
    let mut p = depot_idx;
    let mut updated = Vec::with_capacity(stops.len());

    for (i, stop) in stops.iter().enumerate() {
        let matrix_idx = i + 1;
        let travel = time_matrix[p][matrix_idx];
        let arrival = t + travel;
        t = arrival.max(stop.earliest_min);
        p = matrix_idx;

        let h = (arrival as i64).div_euclid(60);
        let m = (arrival as i64).rem_euclid(60);

        updated.push(ReroutedStop {
            stop_id: stop.stop_id,
            sequence: stop.sequence,
            planned_arrival: format!("{:02}:{:02}", h, m),
            planned_arrival_min: (arrival * 10.0).round() / 10.0,
            lat: stop.lat,
            lng: stop.lng,
        });
    }

    RerouteResponse { route_id, rerouted: true, stops: updated }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_stop_time_matrix() -> Vec<Vec<f64>> {
        // depot(0) -> A(1) -> B(2) -> C(3), 10 min per hop both ways.
        vec![
            vec![0.0, 10.0, 20.0, 30.0],
            vec![10.0, 0.0, 10.0, 20.0],
            vec![20.0, 10.0, 0.0, 10.0],
            vec![30.0, 20.0, 10.0, 0.0],
        ]
    }

    fn three_stops() -> Vec<RerouteStopInput> {
        vec![
            RerouteStopInput { stop_id: Uuid::new_v4(), sequence: 0, lat: 1.0, lng: 1.0, earliest_min: 0.0 },
            RerouteStopInput { stop_id: Uuid::new_v4(), sequence: 1, lat: 2.0, lng: 2.0, earliest_min: 0.0 },
            RerouteStopInput { stop_id: Uuid::new_v4(), sequence: 2, lat: 3.0, lng: 3.0, earliest_min: 0.0 },
        ]
    }

    #[test]
    fn test_apply_traffic_events_multiplies_edge() {
        let mut time = three_stop_time_matrix();
        apply_traffic_events(&mut time, &[TrafficEvent { from_idx: 0, to_idx: 1, delay_factor: 2.0 }]);
        assert_eq!(time[0][1], 20.0);
        // Untouched edges are unaffected.
        assert_eq!(time[1][2], 10.0);
    }

    #[test]
    fn test_apply_traffic_events_skips_out_of_range() {
        let mut time = three_stop_time_matrix();
        apply_traffic_events(&mut time, &[TrafficEvent { from_idx: 99, to_idx: 0, delay_factor: 2.0 }]);
        assert_eq!(time, three_stop_time_matrix());
    }

    /// S6: reroute preserves stop order and length.
    #[test]
    fn test_recompute_etas_preserves_order() {
        let route_id = Uuid::new_v4();
        let stops = three_stops();
        let stop_ids: Vec<Uuid> = stops.iter().map(|s| s.stop_id).collect();
        let time = three_stop_time_matrix();

        let response = recompute_etas(route_id, &stops, &time, 0, 480.0);

        assert_eq!(response.stops.len(), 3);
        let got_ids: Vec<Uuid> = response.stops.iter().map(|s| s.stop_id).collect();
        assert_eq!(got_ids, stop_ids);
        assert_eq!(response.stops[0].sequence, 0);
        assert_eq!(response.stops[2].sequence, 2);
    }

    /// S6: a delayed edge produces a later ETA than a baseline with no events.
    #[test]
    fn test_recompute_etas_s6_delay_increases_eta() {
        let route_id = Uuid::new_v4();
        let stops = three_stops();

        let baseline = three_stop_time_matrix();
        let baseline_response = recompute_etas(route_id, &stops, &baseline, 0, 480.0);

        let mut delayed = three_stop_time_matrix();
        apply_traffic_events(&mut delayed, &[TrafficEvent { from_idx: 0, to_idx: 1, delay_factor: 2.0 }]);
        let delayed_response = recompute_etas(route_id, &stops, &delayed, 0, 480.0);

        assert!(delayed_response.stops[0].planned_arrival_min > baseline_response.stops[0].planned_arrival_min);
    }

    /// ETA rounding: integer-minute truncation, not rounding.
    #[test]
    fn test_recompute_etas_truncates_minutes() {
        let route_id = Uuid::new_v4();
        let stops = vec![RerouteStopInput {
            stop_id: Uuid::new_v4(),
            sequence: 0,
            lat: 0.0,
            lng: 0.0,
            earliest_min: 0.0,
        }];
        // 480 + 10.9 = 490.9 -> 08:10, truncated not rounded to 08:11.
        let time = vec![vec![0.0, 10.9], vec![10.9, 0.0]];

        let response = recompute_etas(route_id, &stops, &time, 0, 480.0);
        assert_eq!(response.stops[0].planned_arrival, "08:10");
        assert_eq!(response.stops[0].planned_arrival_min, 490.9);
    }
}
