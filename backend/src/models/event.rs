//! Event logging for replay and debugging.
//!
//! Every state change the engine makes is recorded as an [`Event`]:
//! - **Playback**: play/pause and rate changes
//! - **Motion**: a train wrapping back to the start of its route
//! - **KPI**: stochastic adjustments and resolution decrements
//! - **Advisory**: apply transitions and delayed evictions
//!
//! # Example
//!
//! ```rust
//! use railops_sim_core::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::AdvisoryApplied {
//!     tick: 3,
//!     advisory_id: "A001".to_string(),
//!     sim_time: "14:33:00".parse().unwrap(),
//! });
//! assert_eq!(log.events_for_advisory("A001").len(), 1);
//! ```

use crate::core::time::{PlaybackRate, SimTime};

/// Engine event capturing a state change.
///
/// All events carry the tick count at which they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PlaybackChanged {
        tick: usize,
        running: bool,
    },

    RateChanged {
        tick: usize,
        from: PlaybackRate,
        to: PlaybackRate,
    },

    /// Train reached the end of its route and restarted at the wrap offset
    TrainWrapped {
        tick: usize,
        train_id: String,
    },

    /// Stochastic jitter changed a KPI value
    KpiAdjusted {
        tick: usize,
        kpi_id: String,
        old_value: f64,
        new_value: f64,
    },

    /// Conflict count decremented by an advisory resolution
    KpiResolution {
        tick: usize,
        kpi_id: String,
        old_value: f64,
        new_value: f64,
    },

    AdvisoryApplied {
        tick: usize,
        advisory_id: String,
        sim_time: SimTime,
    },

    /// Applied advisory removed from the active set after its dwell period
    AdvisoryEvicted {
        tick: usize,
        advisory_id: String,
    },
}

impl Event {
    pub fn tick(&self) -> usize {
        match self {
            Event::PlaybackChanged { tick, .. }
            | Event::RateChanged { tick, .. }
            | Event::TrainWrapped { tick, .. }
            | Event::KpiAdjusted { tick, .. }
            | Event::KpiResolution { tick, .. }
            | Event::AdvisoryApplied { tick, .. }
            | Event::AdvisoryEvicted { tick, .. } => *tick,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::PlaybackChanged { .. } => "PlaybackChanged",
            Event::RateChanged { .. } => "RateChanged",
            Event::TrainWrapped { .. } => "TrainWrapped",
            Event::KpiAdjusted { .. } => "KpiAdjusted",
            Event::KpiResolution { .. } => "KpiResolution",
            Event::AdvisoryApplied { .. } => "AdvisoryApplied",
            Event::AdvisoryEvicted { .. } => "AdvisoryEvicted",
        }
    }

    fn advisory_id(&self) -> Option<&str> {
        match self {
            Event::AdvisoryApplied { advisory_id, .. } | Event::AdvisoryEvicted { advisory_id, .. } => {
                Some(advisory_id)
            }
            _ => None,
        }
    }
}

/// Append-only log of engine events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_at_tick(&self, tick: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_advisory(&self, advisory_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.advisory_id() == Some(advisory_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters() {
        let mut log = EventLog::new();
        log.log(Event::PlaybackChanged { tick: 0, running: true });
        log.log(Event::TrainWrapped {
            tick: 1,
            train_id: "T001".to_string(),
        });
        log.log(Event::AdvisoryEvicted {
            tick: 1,
            advisory_id: "A002".to_string(),
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_at_tick(1).len(), 2);
        assert_eq!(log.events_of_type("TrainWrapped").len(), 1);
        assert_eq!(log.events_for_advisory("A002").len(), 1);
        assert!(log.events_for_advisory("A001").is_empty());
    }
}
