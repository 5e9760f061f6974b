//! OSRM HTTP adapter for walking routes and pairwise distances.
//!
//! The `RoutingApi` trait is the seam between the online strategies and the
//! network; tests substitute it with canned or failing implementations.

use serde::Deserialize;
use thiserror::Error;

use crate::geo::GeoCoordinate;

/// Failures from the external routing/distance services. These never escape
/// the strategy layer; strategies log and substitute the offline result.
#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned no route")]
    NoRoute,
    #[error("service returned no distance")]
    NoDistance,
}

/// External walking-mode lookup surface.
pub trait RoutingApi {
    /// Road-snapped route for one segment, as encoded overview polyline text.
    fn walking_route(
        &self,
        origin: GeoCoordinate,
        destination: GeoCoordinate,
    ) -> Result<String, OsrmError>;

    /// Walking distance for one segment, in meters.
    fn walking_distance_m(
        &self,
        origin: GeoCoordinate,
        destination: GeoCoordinate,
    ) -> Result<f64, OsrmError>;
}

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "foot".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// OSRM expects `lng,lat;lng,lat` pairs in the path.
    fn coord_pair(origin: GeoCoordinate, destination: GeoCoordinate) -> String {
        format!(
            "{:.6},{:.6};{:.6},{:.6}",
            origin.longitude, origin.latitude, destination.longitude, destination.latitude
        )
    }
}

impl RoutingApi for OsrmClient {
    fn walking_route(
        &self,
        origin: GeoCoordinate,
        destination: GeoCoordinate,
    ) -> Result<String, OsrmError> {
        let url = format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline",
            self.config.base_url,
            self.config.profile,
            Self::coord_pair(origin, destination)
        );

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>())?;

        body.routes
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|route| route.geometry)
            .filter(|geometry| !geometry.is_empty())
            .ok_or(OsrmError::NoRoute)
    }

    fn walking_distance_m(
        &self,
        origin: GeoCoordinate,
        destination: GeoCoordinate,
    ) -> Result<f64, OsrmError> {
        let url = format!(
            "{}/table/v1/{}/{}?annotations=distance&sources=0&destinations=1",
            self.config.base_url,
            self.config.profile,
            Self::coord_pair(origin, destination)
        );

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())?;

        body.distances
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .flatten()
            .ok_or(OsrmError::NoDistance)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    routes: Option<Vec<OsrmRouteEntry>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRouteEntry {
    geometry: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    // Unroutable pairs come back as nulls inside the matrix.
    distances: Option<Vec<Vec<Option<f64>>>>,
}
