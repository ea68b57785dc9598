//! Timeline projection
//!
//! Maps schedule events onto a bounded `[0, 1]` axis for rendering. The
//! projector is a pure function: identical events and window always give
//! identical output, and nothing outside the arguments is read or written.
//!
//! # Status derivation
//!
//! ```text
//! delay = round((actual - planned) / 1 min)
//! delay < 0  → Early
//! delay == 0 → OnTime
//! delay > 0  → Delayed
//! overlaps another call at the same station → Conflict (overrides the above)
//! ```

mod conflict;

pub use conflict::{conflict_groups, mark_conflicts, ConflictGroup};

use crate::core::time::SimTime;
use crate::models::timeline::TimelineEvent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MS_PER_MINUTE: i64 = 60_000;

/// Default conflict tolerance: one minute
pub const DEFAULT_CONFLICT_TOLERANCE_MS: i64 = MS_PER_MINUTE;

/// Default projection span: thirty simulated minutes
pub const DEFAULT_WINDOW_SPAN_MS: i64 = 30 * MS_PER_MINUTE;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("Projection window end {end} must be after start {start}")]
    OutOfWindow { start: SimTime, end: SimTime },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub conflict_tolerance_ms: i64,
    pub window_span_ms: i64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            conflict_tolerance_ms: DEFAULT_CONFLICT_TOLERANCE_MS,
            window_span_ms: DEFAULT_WINDOW_SPAN_MS,
        }
    }
}

/// A validated, non-empty simulated-time interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectionWindow {
    start: SimTime,
    end: SimTime,
}

impl ProjectionWindow {
    pub fn new(start: SimTime, end: SimTime) -> Result<Self, ProjectionError> {
        if end <= start {
            return Err(ProjectionError::OutOfWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window beginning at `start` and lasting `span_ms`
    pub fn anchored(start: SimTime, span_ms: i64) -> Result<Self, ProjectionError> {
        Self::new(start, start.offset(span_ms))
    }

    /// Window of `span_ms` with `now` in the middle
    pub fn centered(now: SimTime, span_ms: i64) -> Result<Self, ProjectionError> {
        let before = span_ms / 2;
        Self::new(now.offset(-before), now.offset(span_ms - before))
    }

    pub fn start(&self) -> SimTime {
        self.start
    }

    pub fn end(&self) -> SimTime {
        self.end
    }

    /// Linear position of `t` in `[0, 1]`, clamped at the edges
    pub fn position(&self, t: SimTime) -> f64 {
        let span = self.end.millis_since(self.start) as f64;
        let offset = t.millis_since(self.start) as f64;
        (offset / span).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStatus {
    OnTime,
    Delayed,
    Early,
    Conflict,
}

impl TimelineStatus {
    /// Schedule conformance from a signed whole-minute delay
    pub fn from_delay(delay_minutes: i64) -> Self {
        match delay_minutes {
            d if d < 0 => TimelineStatus::Early,
            0 => TimelineStatus::OnTime,
            _ => TimelineStatus::Delayed,
        }
    }
}

/// Render-ready projection of one schedule event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEvent {
    pub id: String,
    pub entity_label: String,
    pub station: String,
    pub platform: Option<String>,
    pub planned_time: SimTime,
    pub actual_time: SimTime,
    pub planned_position: f64,
    pub actual_position: f64,
    pub delay_minutes: i64,
    pub status: TimelineStatus,
}

/// Signed delay in whole minutes, rounded half away from zero
pub fn delay_minutes(event: &TimelineEvent) -> i64 {
    let diff = event.actual_time.millis_since(event.planned_time);
    (diff as f64 / MS_PER_MINUTE as f64).round() as i64
}

/// Project `events` onto `window`
///
/// Output has one entry per input event, in input order.
///
/// # Example
/// ```
/// use railops_sim_core::timeline::{project, ProjectionWindow, TimelineStatus};
/// use railops_sim_core::{SimTime, TimelineEvent};
///
/// let window = ProjectionWindow::new(
///     SimTime::from_hms(14, 15, 0),
///     SimTime::from_hms(14, 45, 0),
/// ).unwrap();
/// let events = vec![TimelineEvent::new(
///     "T002-1",
///     "Local 002",
///     "KRL",
///     SimTime::from_hms(14, 28, 0),
///     SimTime::from_hms(14, 31, 0),
/// )];
///
/// let out = project(&events, &window, 60_000);
/// assert_eq!(out[0].delay_minutes, 3);
/// assert_eq!(out[0].status, TimelineStatus::Delayed);
/// assert!((out[0].actual_position - 16.0 / 30.0).abs() < 1e-12);
/// ```
pub fn project(
    events: &[TimelineEvent],
    window: &ProjectionWindow,
    conflict_tolerance_ms: i64,
) -> Vec<RenderEvent> {
    let conflicts = mark_conflicts(events, conflict_tolerance_ms);

    events
        .iter()
        .zip(conflicts)
        .map(|(event, in_conflict)| {
            let delay = delay_minutes(event);
            let status = if in_conflict {
                TimelineStatus::Conflict
            } else {
                TimelineStatus::from_delay(delay)
            };

            RenderEvent {
                id: event.id.clone(),
                entity_label: event.entity_label.clone(),
                station: event.station.clone(),
                platform: event.platform.clone(),
                planned_time: event.planned_time,
                actual_time: event.actual_time,
                planned_position: window.position(event.planned_time),
                actual_position: window.position(event.actual_time),
                delay_minutes: delay,
                status,
            }
        })
        .collect()
}

/// Validate raw window bounds, then project
pub fn project_between(
    events: &[TimelineEvent],
    start: SimTime,
    end: SimTime,
    conflict_tolerance_ms: i64,
) -> Result<Vec<RenderEvent>, ProjectionError> {
    let window = ProjectionWindow::new(start, end)?;
    Ok(project(events, &window, conflict_tolerance_ms))
}
