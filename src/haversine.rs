//! Haversine great-circle distance (fallback when the matrix service is
//! unavailable).
//!
//! Less accurate than a road-snapped distance (ignores roads) but always
//! available and deterministic.

use crate::distance::DistanceStrategy;
use crate::geo::GeoCoordinate;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Offline great-circle distance strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineDistance;

impl HaversineDistance {
    pub fn new() -> Self {
        Self
    }

    /// Great-circle distance between two points in kilometers.
    ///
    /// The intermediate term is clamped into [0, 1]; float overshoot near
    /// antipodal pairs would otherwise feed a negative into `sqrt`.
    pub fn haversine_km(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
        let lat1_rad = from.latitude.to_radians();
        let lat2_rad = to.latitude.to_radians();
        let delta_lat = (to.latitude - from.latitude).to_radians();
        let delta_lng = (to.longitude - from.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let a = a.clamp(0.0, 1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

impl DistanceStrategy for HaversineDistance {
    fn path_distance_km(&self, points: &[GeoCoordinate]) -> f64 {
        points
            .windows(2)
            .map(|pair| Self::haversine_km(pair[0], pair[1]))
            .sum()
    }
}
