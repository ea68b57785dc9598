//! KPI record model
//!
//! Each record is a single dashboard indicator (platform utilisation,
//! on-time performance, conflict count, ...). Its value is always kept
//! inside the record's domain; every write goes through [`KpiRecord::set_value`].

use serde::{Deserialize, Serialize};

/// How a KPI's value is constrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiKind {
    /// Clamped to `[0, 100]`, narrowed further by an explicit bound
    Percentage,
    /// Rounded to the nearest integer and floored at zero
    Count,
    /// Free-ranging measurement, clamped only by an explicit bound
    Measure,
}

/// Inclusive value band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiBound {
    pub min: f64,
    pub max: f64,
}

/// Direction of a KPI relative to its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// A single performance indicator
///
/// # Example
/// ```
/// use railops_sim_core::{KpiKind, KpiRecord};
///
/// let mut kpi = KpiRecord::new("platform-util", "Platform Utilization", KpiKind::Percentage, 78.0)
///     .with_unit("%")
///     .with_variance(2.0);
/// kpi.set_value(140.0);
/// assert_eq!(kpi.value(), 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRecord {
    id: String,
    label: String,
    kind: KpiKind,
    value: f64,
    unit: String,
    /// Value at scenario start, used for trend display
    baseline: f64,
    bound: Option<KpiBound>,
    /// Width of the jitter band: deltas are drawn from `±variance/2`
    variance: f64,
}

impl KpiRecord {
    /// Create a record; the initial value is clamped and becomes the baseline
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: KpiKind, value: f64) -> Self {
        let mut record = Self {
            id: id.into(),
            label: label.into(),
            kind,
            value: 0.0,
            unit: String::new(),
            baseline: 0.0,
            bound: None,
            variance: 0.0,
        };
        record.set_value(value);
        record.baseline = record.value;
        record
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Set an explicit bound; the current value and baseline are re-clamped
    pub fn with_bound(mut self, min: f64, max: f64) -> Self {
        self.bound = Some(KpiBound { min, max });
        let current = self.value;
        self.set_value(current);
        self.baseline = self.clamp(self.baseline);
        self
    }

    /// Set the jitter band width; a non-finite variance disables jitter
    pub fn with_variance(mut self, variance: f64) -> Self {
        self.variance = if variance.is_finite() { variance.abs() } else { 0.0 };
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> KpiKind {
        self.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn bound(&self) -> Option<KpiBound> {
        self.bound
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Store a new value, clamped into the record's domain
    pub fn set_value(&mut self, value: f64) {
        self.value = self.clamp(value);
    }

    /// Change relative to baseline
    pub fn change(&self) -> f64 {
        self.value - self.baseline
    }

    pub fn trend(&self) -> Trend {
        let change = self.change();
        if change > f64::EPSILON {
            Trend::Up
        } else if change < -f64::EPSILON {
            Trend::Down
        } else {
            Trend::Neutral
        }
    }

    /// Check whether `value` lies inside this record's domain
    pub fn in_domain(&self, value: f64) -> bool {
        self.clamp(value) == value
    }

    fn clamp(&self, value: f64) -> f64 {
        let value = if value.is_finite() { value } else { self.baseline };
        let (mut min, mut max) = match self.kind {
            KpiKind::Percentage => (0.0, 100.0),
            KpiKind::Count => (0.0, f64::INFINITY),
            KpiKind::Measure => (f64::NEG_INFINITY, f64::INFINITY),
        };
        if let Some(bound) = self.bound {
            min = min.max(bound.min);
            max = max.min(bound.max);
        }

        let value = match self.kind {
            KpiKind::Count => value.round(),
            _ => value,
        };
        let clamped = value.max(min).min(max);
        match self.kind {
            // A fractional bound must not leave a count fractional
            KpiKind::Count => {
                let rounded = clamped.round();
                if rounded > max {
                    max.floor()
                } else if rounded < min {
                    min.ceil()
                } else {
                    rounded
                }
            }
            _ => clamped,
        }
    }
}
