//! Domain models for the dashboard engine

pub mod advisory;
pub mod event;
pub mod kpi;
pub mod state;
pub mod timeline;
pub mod train;

// Re-exports
pub use advisory::{Advisory, AdvisoryCategory, AdvisoryError, AdvisoryPriority, AdvisoryState};
pub use event::{Event, EventLog};
pub use kpi::{KpiBound, KpiKind, KpiRecord, Trend};
pub use timeline::TimelineEvent;
pub use train::{Train, TrainStatus};
