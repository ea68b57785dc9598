//! RailOps Simulator Core - Rust Engine
//!
//! Simulation and temporal-layout engine behind a rail operations dashboard.
//!
//! # Architecture
//!
//! - **core**: Virtual clock, playback rate and simulated timestamps
//! - **motion**: Train positions along looped routes
//! - **kpi**: Stochastic KPI jitter and resolution decrements
//! - **advisories**: Advisory lifecycle and deferred eviction
//! - **timeline**: Pure projection of schedule events onto a render axis
//! - **orchestrator**: Commands, tick loop and snapshots
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Simulated time never decreases, and only advances while running
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Every command fully applies or fully fails

// Module declarations
pub mod advisories;
pub mod core;
pub mod kpi;
pub mod models;
pub mod motion;
pub mod orchestrator;
pub mod preferences;
pub mod rng;
pub mod timeline;

// Re-exports for convenience
pub use crate::core::time::{PlaybackRate, RateError, SimClock, SimTime};
pub use models::{
    advisory::{Advisory, AdvisoryCategory, AdvisoryError, AdvisoryPriority, AdvisoryState},
    event::{Event, EventLog},
    kpi::{KpiBound, KpiKind, KpiRecord, Trend},
    state::SimulationState,
    timeline::TimelineEvent,
    train::{Train, TrainStatus},
};
pub use orchestrator::{
    Command, CommandOutcome, DashboardSnapshot, Orchestrator, SimulationConfig, SimulationError,
    TickResult,
};
pub use preferences::{InMemoryPreferences, PreferenceStore};
pub use rng::RngManager;
pub use timeline::{ProjectionError, ProjectionWindow, RenderEvent, TimelineStatus};
