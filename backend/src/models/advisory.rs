//! Advisory model
//!
//! An advisory is a detected anomaly (conflict, delay, maintenance window,
//! informational notice) waiting for operator acknowledgment. Its lifecycle
//! is one-way: `Pending → Applied`. Applied is terminal.

use crate::core::time::SimTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCategory {
    Conflict,
    Delay,
    Maintenance,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryPriority {
    High,
    Medium,
    Low,
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AdvisoryState {
    Pending,
    Applied {
        /// Simulated time of the transition; `None` when loaded already applied
        applied_at: Option<SimTime>,
    },
}

/// Errors from advisory commands
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdvisoryError {
    #[error("Advisory not found: {0}")]
    NotFound(String),

    #[error("Advisory already applied: {0}")]
    AlreadyApplied(String),
}

/// A single advisory card
///
/// # Example
/// ```
/// use railops_sim_core::{Advisory, AdvisoryCategory, AdvisoryPriority, SimTime};
///
/// let mut advisory = Advisory::new(
///     "A001",
///     AdvisoryCategory::Conflict,
///     AdvisoryPriority::High,
///     SimTime::from_hms(14, 23, 12),
/// )
/// .with_text(
///     "Platform conflict at Thane Junction",
///     "Trains T003 and T006 scheduled for same platform",
///     "Redirect T006 to Platform 3 to avoid 4-minute delay",
/// );
///
/// assert!(advisory.is_pending());
/// advisory.mark_applied(SimTime::from_hms(14, 33, 0)).unwrap();
/// assert!(advisory.mark_applied(SimTime::from_hms(14, 34, 0)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    id: String,
    category: AdvisoryCategory,
    priority: AdvisoryPriority,
    title: String,
    description: String,
    rationale: String,
    created_at: SimTime,
    state: AdvisoryState,
}

impl Advisory {
    pub fn new(
        id: impl Into<String>,
        category: AdvisoryCategory,
        priority: AdvisoryPriority,
        created_at: SimTime,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            priority,
            title: String::new(),
            description: String::new(),
            rationale: String::new(),
            created_at,
            state: AdvisoryState::Pending,
        }
    }

    pub fn with_text(
        mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        self.title = title.into();
        self.description = description.into();
        self.rationale = rationale.into();
        self
    }

    /// Start in the terminal state (fixture cards that were already actioned)
    pub fn already_applied(mut self) -> Self {
        self.state = AdvisoryState::Applied { applied_at: None };
        self
    }

    /// Pending → Applied. Fails without mutation if already applied.
    pub fn mark_applied(&mut self, now: SimTime) -> Result<(), AdvisoryError> {
        match self.state {
            AdvisoryState::Pending => {
                self.state = AdvisoryState::Applied {
                    applied_at: Some(now),
                };
                Ok(())
            }
            AdvisoryState::Applied { .. } => Err(AdvisoryError::AlreadyApplied(self.id.clone())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> AdvisoryCategory {
        self.category
    }

    pub fn priority(&self) -> AdvisoryPriority {
        self.priority
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn created_at(&self) -> SimTime {
        self.created_at
    }

    pub fn state(&self) -> AdvisoryState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == AdvisoryState::Pending
    }
}
