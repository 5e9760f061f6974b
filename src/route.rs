//! Route synthesis strategies.

use tracing::warn;

use crate::geo::GeoCoordinate;
use crate::osrm::RoutingApi;
use crate::polyline;

/// Pluggable producer of the point sequence connecting locations.
pub trait RouteStrategy {
    /// Points connecting one origin/destination pair, endpoints included.
    fn route_points(
        &self,
        origin: GeoCoordinate,
        destination: GeoCoordinate,
    ) -> Vec<GeoCoordinate>;

    /// Stitched path through all waypoints in order.
    ///
    /// Each consecutive segment is computed independently; where two segments
    /// meet, the duplicate junction vertex is dropped so it cannot inflate
    /// point counts or naive distance sums. Fewer than two locations yields an
    /// empty path with no segment calls issued.
    fn full_route_points(&self, locations: &[GeoCoordinate]) -> Vec<GeoCoordinate> {
        if locations.len() < 2 {
            return Vec::new();
        }

        let mut path: Vec<GeoCoordinate> = Vec::new();
        for pair in locations.windows(2) {
            let mut segment = self.route_points(pair[0], pair[1]).into_iter();
            if let Some(first) = segment.next() {
                if path.last() != Some(&first) {
                    path.push(first);
                }
                path.extend(segment);
            }
        }
        path
    }
}

/// Offline strategy: a segment is exactly its two endpoints, no road snapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLineRoute;

impl StraightLineRoute {
    pub fn new() -> Self {
        Self
    }
}

impl RouteStrategy for StraightLineRoute {
    fn route_points(
        &self,
        origin: GeoCoordinate,
        destination: GeoCoordinate,
    ) -> Vec<GeoCoordinate> {
        vec![origin, destination]
    }
}

/// Online strategy: fetches a walking route from the routing service and
/// decodes its overview polyline.
///
/// Fallback to [`StraightLineRoute`] happens per segment, not per call, so a
/// multi-waypoint route may mix snapped and straight segments.
#[derive(Debug, Clone)]
pub struct SnappedRoute<A> {
    api: A,
    fallback: StraightLineRoute,
}

impl<A: RoutingApi> SnappedRoute<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            fallback: StraightLineRoute::new(),
        }
    }
}

impl<A: RoutingApi> RouteStrategy for SnappedRoute<A> {
    fn route_points(
        &self,
        origin: GeoCoordinate,
        destination: GeoCoordinate,
    ) -> Vec<GeoCoordinate> {
        let fetched = self
            .api
            .walking_route(origin, destination)
            .map(|geometry| polyline::decode(&geometry));

        match fetched {
            Ok(Ok(points)) if !points.is_empty() => points,
            Ok(Ok(_)) => {
                warn!("routing service returned empty geometry, using straight segment");
                self.fallback.route_points(origin, destination)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "routing service geometry undecodable, using straight segment");
                self.fallback.route_points(origin, destination)
            }
            Err(err) => {
                warn!(error = %err, "route fetch failed, using straight segment");
                self.fallback.route_points(origin, destination)
            }
        }
    }
}
