//! Schedule event model
//!
//! A planned vs. actual call of a train at a station. The status shown on the
//! timeline (on time, delayed, early, conflict) is not stored here; the
//! projector derives it on every call from the full event set.

use crate::core::time::SimTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub entity_label: String,
    pub planned_time: SimTime,
    pub actual_time: SimTime,
    pub station: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl TimelineEvent {
    pub fn new(
        id: impl Into<String>,
        entity_label: impl Into<String>,
        station: impl Into<String>,
        planned_time: SimTime,
        actual_time: SimTime,
    ) -> Self {
        Self {
            id: id.into(),
            entity_label: entity_label.into(),
            planned_time,
            actual_time,
            station: station.into(),
            platform: None,
        }
    }

    pub fn on_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }
}
