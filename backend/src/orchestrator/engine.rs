//! Orchestrator Engine
//!
//! Owns the [`SimulationState`] and is the only thing that mutates it.
//!
//! # Architecture
//!
//! Commands and ticks share one logical timeline. A command is applied either
//! immediately ([`Orchestrator::execute`]) or queued ([`Orchestrator::submit`])
//! and drained at the next tick boundary. Both paths need `&mut self`, so a
//! command can never interleave with a tick in progress.
//!
//! ```text
//! step(Δreal):
//! 1. Drain queued commands, FIFO, each fully applied or fully rejected
//! 2. Advance clock by Δreal × rate (no-op while paused)
//! 3. If running: advance train positions
//! 4. If running: stochastic KPI update
//! 5. Evict applied advisories whose dwell period has elapsed
//! ```
//!
//! # Example
//!
//! ```rust
//! use railops_sim_core::{Command, Orchestrator, SimTime, SimulationConfig};
//!
//! let config = SimulationConfig::new(42, SimTime::from_hms(14, 32, 15));
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//!
//! orchestrator.execute(Command::Play).unwrap();
//! orchestrator.execute(Command::SetRate { multiplier: 2.0 }).unwrap();
//! orchestrator.step(1_000);
//!
//! assert_eq!(orchestrator.now(), SimTime::from_hms(14, 32, 17));
//! ```

use crate::advisories::{AdvisoryApplied, AdvisoryBook};
use crate::core::time::{PlaybackRate, RateError, SimClock, SimTime};
use crate::kpi::{self, KpiChange};
use crate::models::advisory::AdvisoryError;
use crate::models::event::{Event, EventLog};
use crate::models::state::SimulationState;
use crate::motion;
use crate::orchestrator::command::{Command, CommandOutcome};
use crate::orchestrator::config::SimulationConfig;
use crate::orchestrator::snapshot::{compute_config_hash, ClockSnapshot, DashboardSnapshot};
use crate::preferences::{PreferenceStore, PLAYBACK_RATE_KEY};
use crate::rng::RngManager;
use crate::timeline::{self, ConflictGroup, ProjectionError, ProjectionWindow, RenderEvent};
use log::{debug, info, warn};
use std::collections::VecDeque;
use thiserror::Error;

/// Apply confirmations kept for the read surface
const MAX_NOTIFICATIONS: usize = 10;

/// Simulation error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Rate(#[from] RateError),

    #[error(transparent)]
    Advisory(#[from] AdvisoryError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result of a single tick
#[derive(Debug, Clone)]
pub struct TickResult {
    /// Tick index (0-based)
    pub tick: usize,

    /// Simulated time after the tick
    pub sim_time: SimTime,

    /// Simulated milliseconds advanced (0 while paused)
    pub advanced_ms: u64,

    /// Outcome of each command drained at this boundary, in submit order
    pub commands: Vec<Result<CommandOutcome, SimulationError>>,

    /// Trains that wrapped to the start of their route
    pub wrapped: Vec<String>,

    /// Number of KPI values changed by jitter
    pub num_kpi_changes: usize,

    /// Advisories evicted after their dwell period
    pub evicted: Vec<String>,
}

/// Main controller owning the engine state
///
/// # Determinism
///
/// All randomness comes from `rng` (seeded xorshift64*), so the same config
/// and the same command/tick sequence give identical state.
pub struct Orchestrator {
    state: SimulationState,

    rng: RngManager,

    config: SimulationConfig,

    /// SHA-256 of `config`, reported in snapshots
    config_hash: String,

    preferences: Option<Box<dyn PreferenceStore>>,

    /// Commands waiting for the next tick boundary
    pending_commands: VecDeque<Command>,

    notifications: VecDeque<AdvisoryApplied>,

    event_log: EventLog,

    /// Completed ticks
    tick_count: usize,
}

impl Orchestrator {
    /// Build an engine from a validated scenario
    ///
    /// # Errors
    /// `InvalidConfig` if the scenario breaks any constraint in
    /// [`SimulationConfig::validate`].
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let config_hash = compute_config_hash(&config)?;

        let mut clock = SimClock::new(config.start_time);
        clock.set_rate(config.initial_rate);
        if config.start_running {
            clock.play();
        }

        let advisories = AdvisoryBook::from_advisories(
            config.advisory.dwell_ms,
            config.advisories.iter().map(Into::into),
        )
        .map_err(|dup| SimulationError::InvalidConfig(format!("Duplicate advisory id: {}", dup.id())))?;

        let state = SimulationState::new(
            clock,
            config.trains.iter().map(Into::into).collect(),
            config.kpis.iter().map(Into::into).collect(),
            advisories,
            config.schedule.clone(),
        );

        info!(
            "Scenario loaded: {} trains, {} KPIs, {} advisories, {} schedule events (seed {})",
            config.trains.len(),
            config.kpis.len(),
            config.advisories.len(),
            config.schedule.len(),
            config.rng_seed
        );

        Ok(Self {
            state,
            rng: RngManager::new(config.rng_seed),
            config,
            config_hash,
            preferences: None,
            pending_commands: VecDeque::new(),
            notifications: VecDeque::new(),
            event_log: EventLog::new(),
            tick_count: 0,
        })
    }

    /// Attach a preference store and restore the remembered playback rate
    ///
    /// A stored value that is not a valid rate is ignored.
    pub fn with_preferences(mut self, store: Box<dyn PreferenceStore>) -> Self {
        if let Some(raw) = store.get(PLAYBACK_RATE_KEY) {
            match raw.parse::<f64>().ok().and_then(|m| PlaybackRate::try_from(m).ok()) {
                Some(rate) => {
                    debug!("Restoring playback rate {} from preferences", rate);
                    self.state.clock_mut().set_rate(rate);
                }
                None => warn!("Ignoring stored playback rate '{}'", raw),
            }
        }
        self.preferences = Some(store);
        self
    }

    // ========================================================================
    // Read surface
    // ========================================================================

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn now(&self) -> SimTime {
        self.state.clock().now()
    }

    pub fn current_tick(&self) -> usize {
        self.tick_count
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn preferences(&self) -> Option<&dyn PreferenceStore> {
        self.preferences.as_deref()
    }

    pub fn pending_command_count(&self) -> usize {
        self.pending_commands.len()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let clock = self.state.clock();
        DashboardSnapshot {
            tick: self.tick_count,
            clock: ClockSnapshot {
                sim_time: clock.now(),
                running: clock.is_running(),
                rate: clock.rate(),
                real_elapsed_ms: clock.real_elapsed_ms(),
            },
            trains: self.state.trains().to_vec(),
            kpis: self.state.kpis().iter().map(Into::into).collect(),
            advisories: self.state.advisories().iter().cloned().collect(),
            notifications: self.notifications.iter().cloned().collect(),
            config_hash: self.config_hash.clone(),
        }
    }

    /// Project the scenario schedule onto a window centred on current time
    pub fn project_timeline(&self, span_ms: i64) -> Result<Vec<RenderEvent>, SimulationError> {
        let window = ProjectionWindow::centered(self.now(), span_ms)?;
        Ok(self.project_schedule(&window))
    }

    /// Project the scenario schedule onto an explicit window
    pub fn project_schedule(&self, window: &ProjectionWindow) -> Vec<RenderEvent> {
        timeline::project(
            self.state.schedule(),
            window,
            self.config.timeline.conflict_tolerance_ms,
        )
    }

    pub fn conflict_groups(&self) -> Vec<ConflictGroup> {
        timeline::conflict_groups(self.state.schedule(), self.config.timeline.conflict_tolerance_ms)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Queue a command for the next tick boundary
    pub fn submit(&mut self, command: Command) {
        self.pending_commands.push_back(command);
    }

    /// Apply a command immediately
    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome, SimulationError> {
        let tick = self.tick_count;
        let result = match command {
            Command::Play => Ok(self.set_running(tick, true)),
            Command::Pause => Ok(self.set_running(tick, false)),
            Command::TogglePlayback => {
                let running = !self.state.clock().is_running();
                Ok(self.set_running(tick, running))
            }
            Command::SetRate { multiplier } => PlaybackRate::try_from(multiplier)
                .map(|rate| self.change_rate(tick, rate))
                .map_err(SimulationError::from),
            Command::CycleRate => {
                let next = self.state.clock().rate().cycle();
                Ok(self.change_rate(tick, next))
            }
            Command::ApplyAdvisory { id } => self.apply_advisory(tick, &id),
        };

        if let Err(e) = &result {
            warn!("Command rejected: {}", e);
        }
        result
    }

    fn set_running(&mut self, tick: usize, running: bool) -> CommandOutcome {
        let clock = self.state.clock_mut();
        if clock.is_running() != running {
            if running {
                clock.play();
            } else {
                clock.pause();
            }
            info!("Playback {}", if running { "started" } else { "paused" });
            self.event_log.log(Event::PlaybackChanged { tick, running });
        }
        CommandOutcome::PlaybackChanged { running }
    }

    fn change_rate(&mut self, tick: usize, rate: PlaybackRate) -> CommandOutcome {
        let from = self.state.clock().rate();
        if from != rate {
            self.state.clock_mut().set_rate(rate);
            info!("Playback rate {} -> {}", from, rate);
            self.event_log.log(Event::RateChanged { tick, from, to: rate });
        }
        if let Some(store) = self.preferences.as_mut() {
            store.set(PLAYBACK_RATE_KEY, rate.multiplier().to_string());
        }
        CommandOutcome::RateChanged { rate }
    }

    fn apply_advisory(&mut self, tick: usize, id: &str) -> Result<CommandOutcome, SimulationError> {
        let now = self.state.clock().now();
        let clock_ms = self.state.clock().real_elapsed_ms();
        let applied = self.state.advisories_mut().apply(id, now, clock_ms)?;

        info!("Advisory {} applied at {}", id, now);
        self.event_log.log(Event::AdvisoryApplied {
            tick,
            advisory_id: id.to_string(),
            sim_time: now,
        });

        let conflict_id = self.config.kpi.conflict_kpi_id.clone();
        match kpi::apply_resolution(self.state.kpis_mut(), &conflict_id) {
            Some(change) => self.event_log.log(Event::KpiResolution {
                tick,
                kpi_id: change.kpi_id,
                old_value: change.old_value,
                new_value: change.new_value,
            }),
            None => debug!("No conflict KPI '{}' to decrement", conflict_id),
        }

        self.notifications.push_back(applied.clone());
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }

        Ok(CommandOutcome::AdvisoryApplied(applied))
    }

    // ========================================================================
    // Tick loop
    // ========================================================================

    /// Run one tick using the configured real-time interval
    pub fn tick(&mut self) -> TickResult {
        self.step(self.config.tick_interval_ms)
    }

    /// Drain queued commands, then advance by `delta_real_ms` of real time
    pub fn step(&mut self, delta_real_ms: u64) -> TickResult {
        let tick = self.tick_count;

        let mut commands = Vec::with_capacity(self.pending_commands.len());
        while let Some(command) = self.pending_commands.pop_front() {
            commands.push(self.execute(command));
        }

        let (clock, trains, kpis) = self.state.tick_parts();
        let advanced_ms = clock.tick(delta_real_ms);
        let running = clock.is_running();

        let (wrapped, kpi_changes) = if running {
            let wrapped = motion::advance(trains, &self.config.motion);
            let changes = kpi::update_tick(kpis, self.config.kpi.activation_probability, &mut self.rng);
            (wrapped, changes)
        } else {
            (Vec::new(), Vec::new())
        };

        for train_id in &wrapped {
            self.event_log.log(Event::TrainWrapped {
                tick,
                train_id: train_id.clone(),
            });
        }
        let num_kpi_changes = kpi_changes.len();
        for KpiChange {
            kpi_id,
            old_value,
            new_value,
        } in kpi_changes
        {
            self.event_log.log(Event::KpiAdjusted {
                tick,
                kpi_id,
                old_value,
                new_value,
            });
        }

        let clock_ms = self.state.clock().real_elapsed_ms();
        let evicted = self.state.advisories_mut().sweep(clock_ms);
        for advisory_id in &evicted {
            info!("Advisory {} removed after dwell", advisory_id);
            self.event_log.log(Event::AdvisoryEvicted {
                tick,
                advisory_id: advisory_id.clone(),
            });
        }

        self.tick_count += 1;
        let sim_time = self.now();
        debug!(
            "Tick {} at {}: +{}ms, {} wrapped, {} KPI changes, {} evicted",
            tick,
            sim_time,
            advanced_ms,
            wrapped.len(),
            num_kpi_changes,
            evicted.len()
        );

        TickResult {
            tick,
            sim_time,
            advanced_ms,
            commands,
            wrapped,
            num_kpi_changes,
            evicted,
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("tick", &self.tick_count)
            .field("sim_time", &self.now())
            .field("running", &self.state.clock().is_running())
            .field("rate", &self.state.clock().rate())
            .field("trains", &self.state.num_trains())
            .field("advisories", &self.state.advisories().len())
            .field("pending_commands", &self.pending_commands.len())
            .finish()
    }
}
