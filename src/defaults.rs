//! Shared numeric defaults referenced across the solver, matrix provider, and rerouter.

/// Vehicle dispatch time, in minutes since local midnight (08:00), used by the
/// greedy construction, the route validator, and the rerouter alike.
pub const DEFAULT_DISPATCH_MIN: f64 = 480.0;

/// Fallback average road speed (km/h) used to derive travel time from
/// haversine distance when no road-network matrix provider is configured.
pub const DEFAULT_AVG_SPEED_KMH: f64 = 30.0;

/// Earth radius in kilometers, used by the haversine fallback.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default per-edge traffic delay multiplier applied by the rerouter when a
/// traffic event omits one.
pub const DEFAULT_DELAY_FACTOR: f64 = 1.5;

/// Tolerance below which a 2-opt candidate's distance improvement is
/// considered floating-point noise rather than a real gain.
pub const TWO_OPT_EPSILON: f64 = 1e-6;
