//! Geographic value types shared across the crate.

use serde::{Deserialize, Serialize};

/// A (latitude, longitude) pair in decimal degrees.
///
/// Immutable value type. Equality is exact on the two floats; tests comparing
/// decoded coordinates against originals use a tolerance instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Degrees in [-90, 90].
    pub latitude: f64,
    /// Degrees in [-180, 180].
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A raw location ping as reported by a tracked entity.
///
/// Pings may arrive with either coordinate missing; only pings carrying both
/// participate in polyline computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationPing {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Unix timestamp (seconds) when the ping was recorded.
    pub timestamp: i64,
}

impl LocationPing {
    pub fn new(latitude: Option<f64>, longitude: Option<f64>, timestamp: i64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
        }
    }

    /// The ping's coordinate, if it carries both components.
    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(GeoCoordinate::new(lat, lng)),
            _ => None,
        }
    }
}

/// Coordinates of the valid pings, in input (chronological) order.
pub fn valid_coordinates(pings: &[LocationPing]) -> Vec<GeoCoordinate> {
    pings.iter().filter_map(LocationPing::coordinate).collect()
}
