//! Geographic coordinate pair shared by the matrix provider and solver.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_camel_case_roundtrip() {
        let c = Coordinates::new(50.0755, 14.4378);
        let json = serde_json::to_string(&c).unwrap();
        let back: Coordinates = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
