//! Scenario configuration
//!
//! A scenario is the engine's whole input: seed, starting clock, tuning
//! knobs for each component, and the static fixture data (trains, KPIs,
//! advisories, schedule). It is plain serde data and loads from JSON.

use crate::advisories::AdvisoryConfig;
use crate::core::time::{PlaybackRate, SimTime};
use crate::kpi::KpiConfig;
use crate::models::advisory::{Advisory, AdvisoryCategory, AdvisoryPriority};
use crate::models::kpi::{KpiBound, KpiKind, KpiRecord};
use crate::models::timeline::TimelineEvent;
use crate::models::train::{Train, TrainStatus};
use crate::motion::MotionConfig;
use crate::orchestrator::SimulationError;
use crate::timeline::TimelineConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Real-time tick cadence of the external driver
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

fn default_tick_interval() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

/// Complete scenario configuration
///
/// # Example
/// ```
/// use railops_sim_core::SimulationConfig;
///
/// let config = SimulationConfig::from_json(r#"{
///     "rng_seed": 7,
///     "start_time": "14:32:15",
///     "kpis": [
///         { "id": "conflicts", "label": "Conflict Resolutions", "kind": "count", "value": 12 }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(config.tick_interval_ms, 1_000);
/// assert_eq!(config.kpi.conflict_kpi_id, "conflicts");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed for KPI jitter
    pub rng_seed: u64,

    /// Simulated time at scenario start
    pub start_time: SimTime,

    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    #[serde(default)]
    pub initial_rate: PlaybackRate,

    /// Whether playback starts running; the dashboard opens paused
    #[serde(default)]
    pub start_running: bool,

    #[serde(default)]
    pub motion: MotionConfig,

    #[serde(default)]
    pub kpi: KpiConfig,

    #[serde(default)]
    pub advisory: AdvisoryConfig,

    #[serde(default)]
    pub timeline: TimelineConfig,

    #[serde(default)]
    pub trains: Vec<TrainSeed>,

    #[serde(default)]
    pub kpis: Vec<KpiSeed>,

    #[serde(default)]
    pub advisories: Vec<AdvisorySeed>,

    #[serde(default)]
    pub schedule: Vec<TimelineEvent>,
}

impl SimulationConfig {
    /// Empty scenario at `start_time` with default tuning
    pub fn new(rng_seed: u64, start_time: SimTime) -> Self {
        Self {
            rng_seed,
            start_time,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            initial_rate: PlaybackRate::default(),
            start_running: false,
            motion: MotionConfig::default(),
            kpi: KpiConfig::default(),
            advisory: AdvisoryConfig::default(),
            timeline: TimelineConfig::default(),
            trains: Vec::new(),
            kpis: Vec::new(),
            advisories: Vec::new(),
            schedule: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json)
            .map_err(|e| SimulationError::SerializationError(format!("Scenario parse failed: {}", e)))
    }

    /// Check every constraint the engine relies on
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms must be positive"));
        }

        let step = self.motion.step;
        if !(step > 0.0 && step < 1.0) {
            return Err(invalid(format!("motion step {} must be in (0, 1)", step)));
        }
        let offset = self.motion.wrap_offset;
        if !(0.0..1.0).contains(&offset) {
            return Err(invalid(format!("wrap offset {} must be in [0, 1)", offset)));
        }

        let p = self.kpi.activation_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(invalid(format!("activation probability {} must be in [0, 1]", p)));
        }

        if self.timeline.conflict_tolerance_ms < 0 {
            return Err(invalid("conflict tolerance must not be negative"));
        }
        if self.timeline.window_span_ms <= 0 {
            return Err(invalid("timeline window span must be positive"));
        }

        check_unique("train", self.trains.iter().map(|t| t.id.as_str()))?;
        check_unique("KPI", self.kpis.iter().map(|k| k.id.as_str()))?;
        check_unique("advisory", self.advisories.iter().map(|a| a.id.as_str()))?;
        check_unique("schedule event", self.schedule.iter().map(|e| e.id.as_str()))?;

        for kpi in &self.kpis {
            if !kpi.variance.is_finite() || !kpi.value.is_finite() {
                return Err(invalid(format!("KPI {} has a non-finite value", kpi.id)));
            }
            if let Some(bound) = kpi.bound {
                if !(bound.min <= bound.max) {
                    return Err(invalid(format!(
                        "KPI {} bound [{}, {}] is empty",
                        kpi.id, bound.min, bound.max
                    )));
                }
                if kpi.kind == KpiKind::Count && bound.min.ceil() > bound.max.floor() {
                    return Err(invalid(format!(
                        "count KPI {} bound [{}, {}] contains no integer",
                        kpi.id, bound.min, bound.max
                    )));
                }
            }
        }

        if !self.kpis.is_empty() {
            let conflict_id = &self.kpi.conflict_kpi_id;
            match self.kpis.iter().find(|k| &k.id == conflict_id) {
                Some(k) if k.kind == KpiKind::Count => {}
                Some(_) => {
                    return Err(invalid(format!("conflict KPI {} must be count-typed", conflict_id)))
                }
                None => return Err(invalid(format!("conflict KPI {} not defined", conflict_id))),
            }
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> SimulationError {
    SimulationError::InvalidConfig(msg.into())
}

fn check_unique<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), SimulationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(invalid(format!("Duplicate {} id: {}", what, id)));
        }
    }
    Ok(())
}

/// Initial train fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainSeed {
    pub id: String,
    pub label: String,
    pub position: f64,
    #[serde(default = "default_train_status")]
    pub status: TrainStatus,
    #[serde(default)]
    pub delay_minutes: u32,
    #[serde(default)]
    pub next_waypoint: Option<String>,
    #[serde(default)]
    pub eta: Option<SimTime>,
}

fn default_train_status() -> TrainStatus {
    TrainStatus::OnTime
}

impl From<&TrainSeed> for Train {
    fn from(seed: &TrainSeed) -> Self {
        let train = Train::new(seed.id.clone(), seed.label.clone(), seed.position)
            .with_delay(seed.status, seed.delay_minutes);
        match (&seed.next_waypoint, seed.eta) {
            (Some(waypoint), Some(eta)) => train.with_next_stop(waypoint.clone(), eta),
            _ => train,
        }
    }
}

/// Initial KPI fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiSeed {
    pub id: String,
    pub label: String,
    pub kind: KpiKind,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub bound: Option<KpiBound>,
    #[serde(default)]
    pub variance: f64,
}

impl From<&KpiSeed> for KpiRecord {
    fn from(seed: &KpiSeed) -> Self {
        let record = KpiRecord::new(seed.id.clone(), seed.label.clone(), seed.kind, seed.value)
            .with_unit(seed.unit.clone())
            .with_variance(seed.variance);
        match seed.bound {
            Some(bound) => record.with_bound(bound.min, bound.max),
            None => record,
        }
    }
}

/// Initial advisory fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorySeed {
    pub id: String,
    pub category: AdvisoryCategory,
    pub priority: AdvisoryPriority,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rationale: String,
    pub created_at: SimTime,
    #[serde(default)]
    pub applied: bool,
}

impl From<&AdvisorySeed> for Advisory {
    fn from(seed: &AdvisorySeed) -> Self {
        let advisory = Advisory::new(seed.id.clone(), seed.category, seed.priority, seed.created_at)
            .with_text(seed.title.clone(), seed.description.clone(), seed.rationale.clone());
        if seed.applied {
            advisory.already_applied()
        } else {
            advisory
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SimulationConfig {
        let mut config = SimulationConfig::new(1, SimTime::from_hms(14, 0, 0));
        config.kpis.push(KpiSeed {
            id: "conflicts".to_string(),
            label: "Conflicts".to_string(),
            kind: KpiKind::Count,
            value: 3.0,
            unit: String::new(),
            bound: None,
            variance: 2.0,
        });
        config
    }

    #[test]
    fn test_valid_base() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_step() {
        let mut config = base();
        config.motion.step = 0.0;
        assert!(matches!(config.validate(), Err(SimulationError::InvalidConfig(_))));
        config.motion.step = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_wrap_offset_at_end() {
        let mut config = base();
        config.motion.wrap_offset = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_missing_conflict_kpi() {
        let mut config = base();
        config.kpi.conflict_kpi_id = "nope".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_count_conflict_kpi() {
        let mut config = base();
        config.kpis[0].kind = KpiKind::Percentage;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_count_bound_without_integer() {
        let mut config = base();
        config.kpis[0].bound = Some(KpiBound { min: 0.2, max: 0.8 });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("contains no integer"));

        config.kpis[0].bound = Some(KpiBound { min: 0.2, max: 1.0 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_duplicate_advisory_ids() {
        let mut config = base();
        let seed = AdvisorySeed {
            id: "A1".to_string(),
            category: AdvisoryCategory::Info,
            priority: AdvisoryPriority::Low,
            title: String::new(),
            description: String::new(),
            rationale: String::new(),
            created_at: SimTime::default(),
            applied: false,
        };
        config.advisories = vec![seed.clone(), seed];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate advisory id"));
    }

    #[test]
    fn test_seed_conversion_keeps_fixture_state() {
        let seed = AdvisorySeed {
            id: "A003".to_string(),
            category: AdvisoryCategory::Maintenance,
            priority: AdvisoryPriority::Low,
            title: "Track maintenance window".to_string(),
            description: String::new(),
            rationale: String::new(),
            created_at: SimTime::from_hms(14, 20, 33),
            applied: true,
        };
        let advisory = Advisory::from(&seed);
        assert!(!advisory.is_pending());
        assert_eq!(advisory.title(), "Track maintenance window");
    }
}
