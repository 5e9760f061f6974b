//! Path distance strategies.

use tracing::warn;

use crate::geo::GeoCoordinate;
use crate::haversine::HaversineDistance;
use crate::osrm::RoutingApi;

/// Pluggable path-length calculator.
pub trait DistanceStrategy {
    /// Total length in kilometers over consecutive pairs. Fewer than two
    /// points is a zero-length path.
    fn path_distance_km(&self, points: &[GeoCoordinate]) -> f64;
}

/// Online distance strategy backed by the distance-matrix service, with a
/// whole-call fallback to [`HaversineDistance`].
///
/// One lookup is issued per consecutive pair. If any single lookup fails, all
/// partial online results are discarded and the entire input is handed to the
/// offline strategy, so one call never mixes the two methodologies.
#[derive(Debug, Clone)]
pub struct MatrixDistance<A> {
    api: A,
    fallback: HaversineDistance,
}

impl<A: RoutingApi> MatrixDistance<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            fallback: HaversineDistance::new(),
        }
    }
}

impl<A: RoutingApi> DistanceStrategy for MatrixDistance<A> {
    fn path_distance_km(&self, points: &[GeoCoordinate]) -> f64 {
        if points.len() < 2 {
            return 0.0;
        }

        let mut total_meters = 0.0;
        for pair in points.windows(2) {
            match self.api.walking_distance_m(pair[0], pair[1]) {
                Ok(meters) => total_meters += meters,
                Err(err) => {
                    warn!(error = %err, "distance lookup failed, using haversine for whole path");
                    return self.fallback.path_distance_km(points);
                }
            }
        }

        total_meters / 1000.0
    }
}
