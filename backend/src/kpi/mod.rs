//! KPI aggregation
//!
//! Two independent write paths target the KPI record set:
//!
//! 1. **Stochastic tick** ([`update_tick`]): each record is jittered with
//!    probability `activation_probability` by a uniform delta in
//!    `±variance/2`, then clamped to its domain.
//! 2. **Resolution** ([`apply_resolution`]): applying an advisory takes
//!    exactly one off the conflict count, floored at zero.
//!
//! Both take `&mut [KpiRecord]`, so the borrow checker guarantees one fully
//! completes before the other starts.

use crate::models::kpi::KpiRecord;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Chance that a record is touched on a given tick
pub const DEFAULT_ACTIVATION_PROBABILITY: f64 = 0.1;

/// Record decremented when an advisory is applied
pub const DEFAULT_CONFLICT_KPI_ID: &str = "conflicts";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiConfig {
    pub activation_probability: f64,
    pub conflict_kpi_id: String,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            activation_probability: DEFAULT_ACTIVATION_PROBABILITY,
            conflict_kpi_id: DEFAULT_CONFLICT_KPI_ID.to_string(),
        }
    }
}

/// A single KPI value change
#[derive(Debug, Clone, PartialEq)]
pub struct KpiChange {
    pub kpi_id: String,
    pub old_value: f64,
    pub new_value: f64,
}

/// Apply one tick of stochastic jitter
///
/// Exactly one activation sample is drawn per record, in slice order, plus
/// one delta sample for each activated record. Returns the records whose
/// value actually changed (a clamped or rounded-away delta is not a change).
///
/// # Example
/// ```
/// use railops_sim_core::kpi::update_tick;
/// use railops_sim_core::{KpiKind, KpiRecord, RngManager};
///
/// let mut records = vec![
///     KpiRecord::new("ontime-perf", "On-time Performance", KpiKind::Percentage, 94.2)
///         .with_variance(0.5),
/// ];
/// let mut rng = RngManager::new(42);
///
/// // Probability 1.0 always activates
/// update_tick(&mut records, 1.0, &mut rng);
/// assert!((records[0].value() - 94.2).abs() <= 0.25);
/// ```
pub fn update_tick(
    records: &mut [KpiRecord],
    activation_probability: f64,
    rng: &mut RngManager,
) -> Vec<KpiChange> {
    let mut changes = Vec::new();

    for record in records.iter_mut() {
        if !rng.chance(activation_probability) {
            continue;
        }

        let half = record.variance() / 2.0;
        let delta = rng.uniform(-half, half);
        let old_value = record.value();
        record.set_value(old_value + delta);

        if record.value() != old_value {
            changes.push(KpiChange {
                kpi_id: record.id().to_string(),
                old_value,
                new_value: record.value(),
            });
        }
    }

    changes
}

/// Decrement the conflict-count record by one, floored at zero
///
/// Returns `None` if no record has the given id. A record already at zero
/// yields a change with equal old and new values.
pub fn apply_resolution(records: &mut [KpiRecord], conflict_kpi_id: &str) -> Option<KpiChange> {
    let record = records.iter_mut().find(|r| r.id() == conflict_kpi_id)?;
    let old_value = record.value();
    record.set_value((old_value - 1.0).max(0.0));

    Some(KpiChange {
        kpi_id: conflict_kpi_id.to_string(),
        old_value,
        new_value: record.value(),
    })
}
