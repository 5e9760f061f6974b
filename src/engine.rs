//! Incremental polyline engine.
//!
//! Maintains the persisted `(encoded_polyline, updated_at)` pair for a tracked
//! entity as its ping history grows. A new ping normally extends the stored
//! polyline with one routed segment; a full recompute over the whole history
//! only happens on first computation or after the polyline was cleared
//! out-of-band. The engine returns the new state; persisting it, and
//! serializing concurrent writes to one entity, is the caller's job.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::computer::RouteComputer;
use crate::geo::{GeoCoordinate, LocationPing, valid_coordinates};
use crate::polyline::{self, PolylineError};
use crate::route::RouteStrategy;

/// The persisted polyline pair owned by a tracked entity.
///
/// Both fields are set together or cleared together, never one without the
/// other.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackState {
    pub encoded_polyline: Option<String>,
    /// Unix timestamp (seconds) of the last polyline computation.
    pub updated_at: Option<i64>,
}

impl TrackState {
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn fresh(encoded: String, updated_at: i64) -> Self {
        Self {
            encoded_polyline: Some(encoded),
            updated_at: Some(updated_at),
        }
    }
}

/// Engine failures visible to callers.
///
/// Transient routing/distance service failures never appear here; the
/// strategies absorb them (see the route and distance modules).
#[derive(Debug, Error)]
pub enum TrackError {
    /// The referenced entity or plan does not exist.
    #[error("tracked entity not found")]
    NotFound,
    /// The stored polyline no longer decodes: stored-state corruption, which
    /// must surface rather than be silently replaced.
    #[error("stored polyline is corrupt: {0}")]
    Malformed(#[from] PolylineError),
}

/// Read surface the surrounding application provides for tracked entities.
///
/// `None` from either method means the entity does not exist.
pub trait PingSource {
    type EntityId;

    /// Chronological pings for the entity.
    fn pings(&self, id: &Self::EntityId) -> Option<Vec<LocationPing>>;

    /// Currently persisted track state for the entity.
    fn track_state(&self, id: &Self::EntityId) -> Option<TrackState>;
}

/// A fixed start → waypoints → end plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRoute {
    pub start: GeoCoordinate,
    pub waypoints: Vec<GeoCoordinate>,
    pub end: GeoCoordinate,
}

/// Read surface for fixed route plans.
pub trait PlanSource {
    type PlanId;

    fn plan(&self, id: &Self::PlanId) -> Option<PlanRoute>;
}

/// One evaluation of the incremental-vs-full decision.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackUpdate {
    /// Fewer than two valid pings: clear both state fields.
    Clear,
    /// Extend the stored polyline with one new segment.
    Incremental {
        existing: Vec<GeoCoordinate>,
        from: GeoCoordinate,
        to: GeoCoordinate,
    },
    /// Route the whole history from scratch.
    FullRecompute { points: Vec<GeoCoordinate> },
}

/// Decides how a track should be updated for the given valid-ping coordinates
/// and current state.
///
/// Decoding a corrupt stored polyline fails hard here instead of being papered
/// over by a recompute.
pub fn plan_update(
    valid: &[GeoCoordinate],
    state: &TrackState,
) -> Result<TrackUpdate, TrackError> {
    if valid.len() < 2 {
        return Ok(TrackUpdate::Clear);
    }

    match state.encoded_polyline.as_deref() {
        Some(text) if !text.is_empty() => {
            let existing = polyline::decode(text)?;
            Ok(TrackUpdate::Incremental {
                existing,
                from: valid[valid.len() - 2],
                to: valid[valid.len() - 1],
            })
        }
        _ => Ok(TrackUpdate::FullRecompute {
            points: valid.to_vec(),
        }),
    }
}

/// Synchronous polyline engine over an injected [`RouteStrategy`].
#[derive(Debug, Clone)]
pub struct PolylineEngine<S> {
    computer: RouteComputer<S>,
}

impl<S: RouteStrategy> PolylineEngine<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            computer: RouteComputer::new(strategy),
        }
    }

    /// Reacts to a newly appended ping: extends the stored polyline by one
    /// segment when possible, otherwise recomputes or clears.
    pub fn append_segment<P: PingSource>(
        &self,
        source: &P,
        id: &P::EntityId,
    ) -> Result<TrackState, TrackError> {
        let pings = source.pings(id).ok_or(TrackError::NotFound)?;
        let state = source.track_state(id).ok_or(TrackError::NotFound)?;
        let valid = valid_coordinates(&pings);
        let update = plan_update(&valid, &state)?;
        Ok(self.apply(update))
    }

    /// Recomputes the polyline from the full ping history, ignoring whatever
    /// is currently stored. Used after pings were removed out-of-band.
    pub fn recompute_polyline<P: PingSource>(
        &self,
        source: &P,
        id: &P::EntityId,
    ) -> Result<TrackState, TrackError> {
        let pings = source.pings(id).ok_or(TrackError::NotFound)?;
        let valid = valid_coordinates(&pings);
        let update = plan_update(&valid, &TrackState::cleared())?;
        Ok(self.apply(update))
    }

    /// Computes the polyline for a fixed plan. Plans always recompute in full;
    /// their endpoints can change arbitrarily between calls, so there is no
    /// previous segment to extend.
    pub fn compute_plan_polyline<P: PlanSource>(
        &self,
        source: &P,
        id: &P::PlanId,
    ) -> Result<TrackState, TrackError> {
        let plan = source.plan(id).ok_or(TrackError::NotFound)?;
        debug!(waypoints = plan.waypoints.len(), "computing plan polyline in full");
        match self.computer.compute(plan.start, &plan.waypoints, plan.end) {
            Some(encoded) => Ok(TrackState::fresh(encoded, unix_now())),
            None => Ok(TrackState::cleared()),
        }
    }

    fn apply(&self, update: TrackUpdate) -> TrackState {
        match update {
            TrackUpdate::Clear => {
                debug!("fewer than two valid pings, clearing track state");
                TrackState::cleared()
            }
            TrackUpdate::Incremental {
                mut existing,
                from,
                to,
            } => {
                debug!("extending stored polyline by one segment");
                let segment = self.computer.strategy().route_points(from, to);
                // The segment starts at the previous ping, whose quantized
                // form is already the stored tail; keeping it would double the
                // junction vertex.
                existing.extend(segment.into_iter().skip(1));
                TrackState::fresh(polyline::encode(&existing), unix_now())
            }
            TrackUpdate::FullRecompute { points } => {
                debug!(count = points.len(), "recomputing polyline in full");
                match self.computer.compute_from(&points) {
                    Some(encoded) => TrackState::fresh(encoded, unix_now()),
                    None => TrackState::cleared(),
                }
            }
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(n: usize) -> Vec<GeoCoordinate> {
        (0..n)
            .map(|i| GeoCoordinate::new(36.0 + i as f64 * 0.01, -115.0 - i as f64 * 0.01))
            .collect()
    }

    #[test]
    fn test_under_two_valid_pings_clears() {
        assert_eq!(
            plan_update(&coords(0), &TrackState::cleared()).unwrap(),
            TrackUpdate::Clear
        );
        assert_eq!(
            plan_update(&coords(1), &TrackState::cleared()).unwrap(),
            TrackUpdate::Clear
        );
    }

    #[test]
    fn test_existing_polyline_goes_incremental() {
        let valid = coords(3);
        let state = TrackState::fresh(polyline::encode(&valid[..2]), 100);

        match plan_update(&valid, &state).unwrap() {
            TrackUpdate::Incremental { existing, from, to } => {
                assert_eq!(existing.len(), 2);
                assert_eq!(from, valid[1]);
                assert_eq!(to, valid[2]);
            }
            other => panic!("expected incremental, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_or_absent_polyline_goes_full() {
        let valid = coords(3);

        let absent = plan_update(&valid, &TrackState::cleared()).unwrap();
        assert_eq!(
            absent,
            TrackUpdate::FullRecompute {
                points: valid.clone()
            }
        );

        let empty = TrackState {
            encoded_polyline: Some(String::new()),
            updated_at: Some(100),
        };
        assert_eq!(
            plan_update(&valid, &empty).unwrap(),
            TrackUpdate::FullRecompute { points: valid }
        );
    }

    #[test]
    fn test_corrupt_stored_polyline_is_a_hard_error() {
        let state = TrackState::fresh("_".to_string(), 100);
        let err = plan_update(&coords(2), &state).unwrap_err();
        assert!(matches!(err, TrackError::Malformed(_)));
    }
}
