//! Train motion along looped routes
//!
//! Each running tick moves every train forward by a fixed fraction of its
//! route. A train that reaches the end restarts at [`DEFAULT_WRAP_OFFSET`]
//! rather than exactly at the origin, so markers never sit on the terminus
//! glyph. Trains wrap independently of each other.
//!
//! No randomness: the result is a pure function of prior positions and the
//! number of ticks.

use crate::models::train::Train;
use serde::{Deserialize, Serialize};

/// Fraction of the route covered per tick (0.1% of the line)
pub const DEFAULT_STEP: f64 = 0.001;

/// Position a train restarts at after reaching the end of its route
pub const DEFAULT_WRAP_OFFSET: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Route fraction advanced per running tick, in `(0, 1)`
    pub step: f64,
    /// Restart position after a wrap, in `[0, 1)`
    pub wrap_offset: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            wrap_offset: DEFAULT_WRAP_OFFSET,
        }
    }
}

/// Advance every train by `config.step`, wrapping at the end of the route
///
/// Returns the ids of trains that wrapped during this step.
///
/// # Example
/// ```
/// use railops_sim_core::motion::{advance, MotionConfig};
/// use railops_sim_core::Train;
///
/// let mut trains = vec![Train::new("T001", "Fast 001", 0.9995)];
/// let wrapped = advance(&mut trains, &MotionConfig::default());
///
/// assert_eq!(wrapped, vec!["T001".to_string()]);
/// assert_eq!(trains[0].route_position(), 0.05);
/// ```
pub fn advance(trains: &mut [Train], config: &MotionConfig) -> Vec<String> {
    let mut wrapped = Vec::new();

    for train in trains.iter_mut() {
        let next = train.route_position() + config.step;
        if next >= 1.0 {
            train.set_route_position(config.wrap_offset);
            wrapped.push(train.id().to_string());
        } else {
            train.set_route_position(next);
        }
    }

    wrapped
}

/// Number of ticks a train at `position` needs before it wraps
pub fn ticks_until_wrap(position: f64, config: &MotionConfig) -> u64 {
    let remaining = (1.0 - position).max(0.0);
    (remaining / config.step).ceil().max(1.0) as u64
}
