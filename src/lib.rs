//! trackline core
//!
//! Route synthesis and encoded-polyline engine: turns GPS pings or planned
//! waypoints into compact polyline text, with deterministic offline fallbacks
//! for the external routing and distance services.

pub mod geo;
pub mod polyline;
pub mod haversine;
pub mod distance;
pub mod route;
pub mod osrm;
pub mod computer;
pub mod engine;
