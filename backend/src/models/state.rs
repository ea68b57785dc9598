//! Simulation State
//!
//! The single aggregate holding everything the dashboard engine mutates:
//! clock, trains, KPI records and the active advisory set, plus the
//! read-only schedule the timeline is projected from.
//!
//! # Ownership
//!
//! The state is owned by one [`Orchestrator`](crate::Orchestrator). Consumers
//! get shared references or a serialized snapshot; there is no ambient
//! global copy.
//!
//! # Critical Invariants
//!
//! 1. **Positions**: every train's `route_position` is in `[0, 1)`
//! 2. **KPI domain**: every KPI value lies inside its record's domain
//! 3. **Advisory identity**: ids are unique within the active set

use crate::advisories::AdvisoryBook;
use crate::core::time::SimClock;
use crate::models::kpi::KpiRecord;
use crate::models::timeline::TimelineEvent;
use crate::models::train::Train;

/// Complete engine state
///
/// # Example
///
/// ```rust
/// use railops_sim_core::advisories::AdvisoryBook;
/// use railops_sim_core::{SimClock, SimTime, SimulationState, Train};
///
/// let state = SimulationState::new(
///     SimClock::new(SimTime::from_hms(14, 32, 15)),
///     vec![Train::new("T001", "Fast 001", 0.12)],
///     Vec::new(),
///     AdvisoryBook::new(2_300),
///     Vec::new(),
/// );
/// assert_eq!(state.num_trains(), 1);
/// assert!(state.get_train("T001").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct SimulationState {
    clock: SimClock,
    trains: Vec<Train>,
    kpis: Vec<KpiRecord>,
    advisories: AdvisoryBook,
    schedule: Vec<TimelineEvent>,
}

impl SimulationState {
    pub fn new(
        clock: SimClock,
        trains: Vec<Train>,
        kpis: Vec<KpiRecord>,
        advisories: AdvisoryBook,
        schedule: Vec<TimelineEvent>,
    ) -> Self {
        Self {
            clock,
            trains,
            kpis,
            advisories,
            schedule,
        }
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn trains_mut(&mut self) -> &mut [Train] {
        &mut self.trains
    }

    pub fn get_train(&self, id: &str) -> Option<&Train> {
        self.trains.iter().find(|t| t.id() == id)
    }

    pub fn num_trains(&self) -> usize {
        self.trains.len()
    }

    pub fn kpis(&self) -> &[KpiRecord] {
        &self.kpis
    }

    pub fn kpis_mut(&mut self) -> &mut [KpiRecord] {
        &mut self.kpis
    }

    pub fn get_kpi(&self, id: &str) -> Option<&KpiRecord> {
        self.kpis.iter().find(|k| k.id() == id)
    }

    pub fn advisories(&self) -> &AdvisoryBook {
        &self.advisories
    }

    pub fn advisories_mut(&mut self) -> &mut AdvisoryBook {
        &mut self.advisories
    }

    pub fn schedule(&self) -> &[TimelineEvent] {
        &self.schedule
    }

    /// Split borrow for the tick path: clock, trains and KPIs at once
    pub(crate) fn tick_parts(&mut self) -> (&mut SimClock, &mut [Train], &mut [KpiRecord]) {
        (&mut self.clock, &mut self.trains, &mut self.kpis)
    }
}
