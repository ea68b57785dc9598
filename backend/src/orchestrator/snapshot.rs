//! Snapshot - read surface for the presentation layer
//!
//! A [`DashboardSnapshot`] is a serializable copy of everything the
//! dashboard renders in one cycle. It carries a fingerprint of the scenario
//! config so a consumer can tell which scenario produced it.

use crate::advisories::AdvisoryApplied;
use crate::core::time::{PlaybackRate, SimTime};
use crate::models::advisory::Advisory;
use crate::models::kpi::{KpiKind, KpiRecord, Trend};
use crate::models::train::Train;
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Number of completed ticks
    pub tick: usize,
    pub clock: ClockSnapshot,
    pub trains: Vec<Train>,
    pub kpis: Vec<KpiSnapshot>,
    pub advisories: Vec<Advisory>,
    /// Most recent apply confirmations, oldest first
    pub notifications: Vec<AdvisoryApplied>,
    /// SHA-256 of the scenario config
    pub config_hash: String,
}

impl DashboardSnapshot {
    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimulationError::SerializationError(format!("Snapshot serialization failed: {}", e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub sim_time: SimTime,
    pub running: bool,
    pub rate: PlaybackRate,
    pub real_elapsed_ms: u64,
}

/// KPI as displayed, with trend against baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub id: String,
    pub label: String,
    pub kind: KpiKind,
    pub value: f64,
    pub unit: String,
    pub baseline: f64,
    pub change: f64,
    pub trend: Trend,
}

impl From<&KpiRecord> for KpiSnapshot {
    fn from(record: &KpiRecord) -> Self {
        KpiSnapshot {
            id: record.id().to_string(),
            label: record.label().to_string(),
            kind: record.kind(),
            value: record.value(),
            unit: record.unit().to_string(),
            baseline: record.baseline(),
            change: record.change(),
            trend: record.trend(),
        }
    }
}

/// Compute a deterministic SHA-256 hash of a config
///
/// Keys are sorted before hashing so the result does not depend on map
/// iteration order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config)
        .map_err(|e| SimulationError::SerializationError(format!("Config serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| SimulationError::SerializationError(format!("Config serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
