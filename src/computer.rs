//! Shared route computation: locations in, encoded polyline out.

use crate::geo::GeoCoordinate;
use crate::polyline;
use crate::route::RouteStrategy;

/// Builds complete encoded routes through an injected [`RouteStrategy`].
#[derive(Debug, Clone)]
pub struct RouteComputer<S> {
    strategy: S,
}

impl<S: RouteStrategy> RouteComputer<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Routes start → waypoints → end and encodes the result.
    ///
    /// `None` is the no-route condition: the strategy produced fewer than two
    /// points for the requested locations.
    pub fn compute(
        &self,
        start: GeoCoordinate,
        waypoints: &[GeoCoordinate],
        end: GeoCoordinate,
    ) -> Option<String> {
        let mut locations = Vec::with_capacity(waypoints.len() + 2);
        locations.push(start);
        locations.extend_from_slice(waypoints);
        locations.push(end);
        self.compute_from(&locations)
    }

    /// Routes an already-ordered location list and encodes the result.
    pub fn compute_from(&self, locations: &[GeoCoordinate]) -> Option<String> {
        let points = self.strategy.full_route_points(locations);
        if points.len() < 2 {
            return None;
        }
        Some(polyline::encode(&points))
    }
}
