//! Operator commands
//!
//! The presentation layer never mutates engine state directly; it produces
//! [`Command`] values and reads snapshots. Every command either fully applies
//! or fails with a typed error and leaves state untouched.

use crate::advisories::AdvisoryApplied;
use crate::core::time::PlaybackRate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Play,
    Pause,
    /// Play if paused, pause if playing
    TogglePlayback,
    /// Set a raw multiplier; anything outside 0.5/1/2/4 is rejected
    SetRate { multiplier: f64 },
    /// Step to the next rate in the 0.5 → 1 → 2 → 4 → 0.5 cycle
    CycleRate,
    ApplyAdvisory { id: String },
}

/// What a successful command did
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    PlaybackChanged { running: bool },
    RateChanged { rate: PlaybackRate },
    AdvisoryApplied(AdvisoryApplied),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let cmd: Command = serde_json::from_str(r#"{"type":"apply_advisory","id":"A001"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::ApplyAdvisory {
                id: "A001".to_string()
            }
        );

        let cmd: Command = serde_json::from_str(r#"{"type":"set_rate","multiplier":2.0}"#).unwrap();
        assert_eq!(cmd, Command::SetRate { multiplier: 2.0 });
    }
}
