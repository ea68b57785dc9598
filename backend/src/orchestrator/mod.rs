//! Orchestrator - command handling and the tick loop
//!
//! See `engine.rs` for the step sequence.

pub mod command;
pub mod config;
pub mod engine;
pub mod snapshot;

// Re-export main types for convenience
pub use command::{Command, CommandOutcome};
pub use config::{AdvisorySeed, KpiSeed, SimulationConfig, TrainSeed, DEFAULT_TICK_INTERVAL_MS};
pub use engine::{Orchestrator, SimulationError, TickResult};
pub use snapshot::{compute_config_hash, ClockSnapshot, DashboardSnapshot, KpiSnapshot};
