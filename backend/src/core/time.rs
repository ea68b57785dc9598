//! Simulated time for the dashboard engine
//!
//! The engine keeps its own clock, distinct from wall-clock time. An external
//! driver calls [`SimClock::tick`] at a fixed real-time cadence; while the
//! clock is running, simulated time advances by `real elapsed × rate`.
//!
//! Two counters are kept:
//! - **simulated time**: frozen while paused, scaled by the playback rate
//! - **real elapsed**: every tick's real delta, running or not (used for
//!   presentation dwell periods such as advisory eviction)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Errors raised by clock commands
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RateError {
    #[error("Playback rate {0} is not one of 0.5, 1, 2, 4")]
    InvalidRate(f64),
}

/// Errors raised when parsing a clock string
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeParseError {
    #[error("Invalid time '{0}': expected HH:MM or HH:MM:SS")]
    Malformed(String),
}

/// A point on the simulated timeline, in milliseconds since simulated midnight
///
/// Values past 24h are allowed (the simulation may run over midnight);
/// [`fmt::Display`] renders the time-of-day modulo 24h.
///
/// # Example
/// ```
/// use railops_sim_core::SimTime;
///
/// let t: SimTime = "14:28".parse().unwrap();
/// assert_eq!(t, SimTime::from_hms(14, 28, 0));
/// assert_eq!(t.to_string(), "14:28:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SimTime(i64);

impl SimTime {
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub const fn from_hms(hours: i64, minutes: i64, seconds: i64) -> Self {
        Self(hours * MS_PER_HOUR + minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND)
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Latest representable instant
    pub const MAX: SimTime = SimTime(i64::MAX);

    /// Shift by a signed number of milliseconds, saturating at the `i64` range
    pub const fn offset(self, ms: i64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Signed distance `self - earlier` in milliseconds, saturating
    pub const fn millis_since(self, earlier: SimTime) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let of_day = self.0.rem_euclid(MS_PER_DAY);
        write!(
            f,
            "{:02}:{:02}:{:02}",
            of_day / MS_PER_HOUR,
            (of_day % MS_PER_HOUR) / MS_PER_MINUTE,
            (of_day % MS_PER_MINUTE) / MS_PER_SECOND
        )
    }
}

impl FromStr for SimTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeParseError::Malformed(s.to_string());
        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(malformed());
        }

        let mut fields = [0i64; 3];
        for (slot, part) in fields.iter_mut().zip(&parts) {
            *slot = part.parse::<i64>().map_err(|_| malformed())?;
        }
        let [hours, minutes, seconds] = fields;
        if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
            return Err(malformed());
        }

        hours
            .checked_mul(MS_PER_HOUR)
            .and_then(|ms| ms.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND))
            .map(SimTime)
            .ok_or_else(malformed)
    }
}

impl TryFrom<String> for SimTime {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SimTime> for String {
    fn from(value: SimTime) -> Self {
        value.to_string()
    }
}

/// The enumerated set of playback multipliers
///
/// Rates are exact rationals so scaling never accumulates float error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum PlaybackRate {
    Half,
    #[default]
    Normal,
    Double,
    Quadruple,
}

impl PlaybackRate {
    pub const ALL: [PlaybackRate; 4] = [
        PlaybackRate::Half,
        PlaybackRate::Normal,
        PlaybackRate::Double,
        PlaybackRate::Quadruple,
    ];

    /// Multiplier as `(numerator, denominator)`
    pub const fn ratio(self) -> (u64, u64) {
        match self {
            PlaybackRate::Half => (1, 2),
            PlaybackRate::Normal => (1, 1),
            PlaybackRate::Double => (2, 1),
            PlaybackRate::Quadruple => (4, 1),
        }
    }

    pub fn multiplier(self) -> f64 {
        let (num, den) = self.ratio();
        num as f64 / den as f64
    }

    /// Next rate in the doubling cycle: 0.5 → 1 → 2 → 4 → 0.5
    pub const fn cycle(self) -> Self {
        match self {
            PlaybackRate::Half => PlaybackRate::Normal,
            PlaybackRate::Normal => PlaybackRate::Double,
            PlaybackRate::Double => PlaybackRate::Quadruple,
            PlaybackRate::Quadruple => PlaybackRate::Half,
        }
    }
}

impl TryFrom<f64> for PlaybackRate {
    type Error = RateError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        PlaybackRate::ALL
            .into_iter()
            .find(|rate| rate.multiplier() == value)
            .ok_or(RateError::InvalidRate(value))
    }
}

impl From<PlaybackRate> for f64 {
    fn from(value: PlaybackRate) -> Self {
        value.multiplier()
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.multiplier())
    }
}

/// Virtual clock owning simulated time, playback state and rate
///
/// # Example
/// ```
/// use railops_sim_core::{PlaybackRate, SimClock, SimTime};
///
/// let mut clock = SimClock::new(SimTime::from_hms(14, 32, 15));
/// clock.play();
/// clock.set_rate(PlaybackRate::Double);
/// clock.tick(1_000);
/// assert_eq!(clock.now(), SimTime::from_hms(14, 32, 17));
///
/// clock.pause();
/// clock.tick(1_000);
/// assert_eq!(clock.now(), SimTime::from_hms(14, 32, 17));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    simulated_time: SimTime,
    running: bool,
    rate: PlaybackRate,
    /// Scaled sub-millisecond remainder carried between ticks (in `1/den` ms)
    carry: u64,
    /// Real milliseconds seen by `tick`, regardless of playback state
    real_elapsed_ms: u64,
}

impl SimClock {
    /// Create a paused clock at `start` with 1× rate
    pub fn new(start: SimTime) -> Self {
        Self {
            simulated_time: start,
            running: false,
            rate: PlaybackRate::Normal,
            carry: 0,
            real_elapsed_ms: 0,
        }
    }

    pub fn play(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn set_rate(&mut self, rate: PlaybackRate) {
        if rate != self.rate {
            // Remainder is expressed in the old denominator
            self.carry = 0;
        }
        self.rate = rate;
    }

    /// Set the rate from a raw multiplier, rejecting values outside the set
    pub fn set_rate_multiplier(&mut self, multiplier: f64) -> Result<PlaybackRate, RateError> {
        let rate = PlaybackRate::try_from(multiplier)?;
        self.set_rate(rate);
        Ok(rate)
    }

    /// Advance to the next rate in the cycle and return it
    pub fn cycle_rate(&mut self) -> PlaybackRate {
        let next = self.rate.cycle();
        self.set_rate(next);
        next
    }

    /// Advance the clock by `delta_real_ms` of real time
    ///
    /// Returns the simulated milliseconds advanced (zero while paused).
    pub fn tick(&mut self, delta_real_ms: u64) -> u64 {
        self.real_elapsed_ms = self.real_elapsed_ms.saturating_add(delta_real_ms);
        if !self.running {
            return 0;
        }

        let (num, den) = self.rate.ratio();
        let scaled = delta_real_ms.saturating_mul(num).saturating_add(self.carry);
        let advanced = scaled / den;
        self.carry = scaled % den;
        // Saturates at SimTime::MAX; time never wraps backwards
        self.simulated_time = self
            .simulated_time
            .offset(i64::try_from(advanced).unwrap_or(i64::MAX));
        advanced
    }

    pub fn now(&self) -> SimTime {
        self.simulated_time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn rate(&self) -> PlaybackRate {
        self.rate
    }

    pub fn real_elapsed_ms(&self) -> u64 {
        self.real_elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_rate_carries_remainder() {
        let mut clock = SimClock::new(SimTime::default());
        clock.play();
        clock.set_rate(PlaybackRate::Half);

        assert_eq!(clock.tick(1), 0);
        assert_eq!(clock.tick(1), 1);
        assert_eq!(clock.now().as_millis(), 1);
    }

    #[test]
    fn test_real_elapsed_counts_paused_ticks() {
        let mut clock = SimClock::new(SimTime::default());
        clock.tick(500);
        clock.tick(500);
        assert_eq!(clock.real_elapsed_ms(), 1_000);
        assert_eq!(clock.now().as_millis(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("14".parse::<SimTime>().is_err());
        assert!("14:61".parse::<SimTime>().is_err());
        assert!("aa:bb".parse::<SimTime>().is_err());
        assert!("1:2:3:4".parse::<SimTime>().is_err());
    }

    #[test]
    fn test_parse_rejects_overflowing_hours() {
        assert!("9223372036854775807:00".parse::<SimTime>().is_err());
    }

    #[test]
    fn test_offset_saturates() {
        let t = SimTime::from_hms(14, 0, 0);
        assert_eq!(t.offset(i64::MAX), SimTime::MAX);
        assert_eq!(SimTime::MAX.millis_since(SimTime::from_millis(-1)), i64::MAX);
    }

    #[test]
    fn test_display_wraps_past_midnight() {
        assert_eq!(SimTime::from_hms(25, 0, 5).to_string(), "01:00:05");
    }

    #[test]
    fn test_rate_serde_uses_multiplier() {
        let json = serde_json::to_string(&PlaybackRate::Half).unwrap();
        assert_eq!(json, "0.5");
        let rate: PlaybackRate = serde_json::from_str("4.0").unwrap();
        assert_eq!(rate, PlaybackRate::Quadruple);
        assert!(serde_json::from_str::<PlaybackRate>("3.0").is_err());
    }
}
