//! Train model
//!
//! A tracked moving entity on the network map. The only field that changes
//! during a run is `route_position`, owned by the motion model; the rest is
//! fixture data shown alongside the marker.

use crate::core::time::SimTime;
use serde::{Deserialize, Serialize};

/// Schedule conformance shown on the map marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainStatus {
    OnTime,
    Delayed,
}

/// A train's position and display state
///
/// # Example
/// ```
/// use railops_sim_core::{SimTime, Train, TrainStatus};
///
/// let train = Train::new("T001", "Fast 001", 0.12)
///     .with_delay(TrainStatus::OnTime, 0)
///     .with_next_stop("MAT", SimTime::from_hms(14, 25, 0));
/// assert_eq!(train.route_position(), 0.12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Train {
    id: String,
    label: String,
    /// Normalized progress along the route, always in `[0, 1)`
    route_position: f64,
    status: TrainStatus,
    delay_minutes: u32,
    next_waypoint: Option<String>,
    eta: Option<SimTime>,
}

impl Train {
    /// Create an on-time train; positions outside `[0, 1)` are folded back in
    pub fn new(id: impl Into<String>, label: impl Into<String>, route_position: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            route_position: normalize_position(route_position),
            status: TrainStatus::OnTime,
            delay_minutes: 0,
            next_waypoint: None,
            eta: None,
        }
    }

    pub fn with_delay(mut self, status: TrainStatus, delay_minutes: u32) -> Self {
        self.status = status;
        self.delay_minutes = delay_minutes;
        self
    }

    pub fn with_next_stop(mut self, waypoint: impl Into<String>, eta: SimTime) -> Self {
        self.next_waypoint = Some(waypoint.into());
        self.eta = Some(eta);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn route_position(&self) -> f64 {
        self.route_position
    }

    pub fn status(&self) -> TrainStatus {
        self.status
    }

    pub fn delay_minutes(&self) -> u32 {
        self.delay_minutes
    }

    pub fn next_waypoint(&self) -> Option<&str> {
        self.next_waypoint.as_deref()
    }

    pub fn eta(&self) -> Option<SimTime> {
        self.eta
    }

    pub(crate) fn set_route_position(&mut self, position: f64) {
        self.route_position = position;
    }
}

/// Fold an arbitrary value into `[0, 1)`
fn normalize_position(position: f64) -> f64 {
    if !position.is_finite() {
        return 0.0;
    }
    let folded = position.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if folded >= 1.0 {
        0.0
    } else {
        folded
    }
}
