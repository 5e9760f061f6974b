use trackline::distance::{DistanceStrategy, MatrixDistance};
use trackline::geo::GeoCoordinate;
use trackline::haversine::HaversineDistance;
use trackline::osrm::{OsrmError, RoutingApi};
use trackline::polyline;
use trackline::route::{RouteStrategy, SnappedRoute, StraightLineRoute};

/// Simulates a dead routing service: every lookup fails.
struct DeadService;

impl RoutingApi for DeadService {
    fn walking_route(
        &self,
        _origin: GeoCoordinate,
        _destination: GeoCoordinate,
    ) -> Result<String, OsrmError> {
        Err(OsrmError::NoRoute)
    }

    fn walking_distance_m(
        &self,
        _origin: GeoCoordinate,
        _destination: GeoCoordinate,
    ) -> Result<f64, OsrmError> {
        Err(OsrmError::NoDistance)
    }
}

/// Snaps every segment to a three-point detour, except segments whose origin
/// latitude matches `fail_at`, which fail.
struct PartialService {
    fail_at: f64,
}

impl PartialService {
    fn new(fail_at: f64) -> Self {
        Self { fail_at }
    }

    fn detour(origin: GeoCoordinate, destination: GeoCoordinate) -> Vec<GeoCoordinate> {
        let mid = GeoCoordinate::new(
            (origin.latitude + destination.latitude) / 2.0 + 0.001,
            (origin.longitude + destination.longitude) / 2.0,
        );
        vec![origin, mid, destination]
    }
}

impl RoutingApi for PartialService {
    fn walking_route(
        &self,
        origin: GeoCoordinate,
        destination: GeoCoordinate,
    ) -> Result<String, OsrmError> {
        if origin.latitude == self.fail_at {
            return Err(OsrmError::NoRoute);
        }
        Ok(polyline::encode(&Self::detour(origin, destination)))
    }

    fn walking_distance_m(
        &self,
        _origin: GeoCoordinate,
        _destination: GeoCoordinate,
    ) -> Result<f64, OsrmError> {
        Err(OsrmError::NoDistance)
    }
}

fn zurich_walk() -> Vec<GeoCoordinate> {
    vec![
        GeoCoordinate::new(47.3769, 8.5417),
        GeoCoordinate::new(47.3782, 8.5438),
        GeoCoordinate::new(47.3799, 8.5452),
    ]
}

#[test]
fn dead_route_service_matches_offline_result() {
    let locations = zurich_walk();

    let online = SnappedRoute::new(DeadService).full_route_points(&locations);
    let offline = StraightLineRoute::new().full_route_points(&locations);
    assert_eq!(online, offline);
}

#[test]
fn dead_distance_service_matches_offline_result() {
    let locations = zurich_walk();

    let online = MatrixDistance::new(DeadService).path_distance_km(&locations);
    let offline = HaversineDistance::new().path_distance_km(&locations);
    assert!((online - offline).abs() < 1e-12);
}

#[test]
fn segment_fallback_mixes_snapped_and_straight() {
    let locations = zurich_walk();

    // The second segment's origin fails; the first segment snaps to a detour
    // while the second falls back to a straight line.
    let strategy = SnappedRoute::new(PartialService::new(locations[1].latitude));
    let path = strategy.full_route_points(&locations);

    // Snapped [l0, mid, l1] plus straight [l1, l2] with the junction counted
    // once.
    assert_eq!(path.len(), 4);
    assert!((path[0].latitude - locations[0].latitude).abs() < 1e-5);
    let mid_lat = (locations[0].latitude + locations[1].latitude) / 2.0 + 0.001;
    assert!((path[1].latitude - mid_lat).abs() < 1e-5);
    assert_eq!(path[3], locations[2]);
    for pair in path.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn no_adjacent_duplicates_at_junction_for_any_strategy() {
    let locations = zurich_walk();

    let offline = StraightLineRoute::new().full_route_points(&locations);
    for pair in offline.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }

    let online = SnappedRoute::new(PartialService::new(f64::NAN)).full_route_points(&locations);
    for pair in online.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
    // Each snapped segment contributes its origin, detour midpoint, and
    // destination, with shared junctions counted once.
    assert_eq!(online.len(), 5);
}
