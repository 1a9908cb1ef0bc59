//! Engine settings
//!
//! Every section uses `#[serde(default)]` so a partial YAML file only
//! overrides the keys it names.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crossfader::CrossfaderCurve;
use crate::types::DEFAULT_BPM;

/// Top-level configuration for the sync engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub tempo: TempoConfig,
    pub matcher: MatcherConfig,
    pub mixer: MixerConfig,
    pub auto_dj: AutoDjConfig,
}

/// Tempo estimation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoConfig {
    /// Length of one energy block in seconds
    /// Onset intervals are measured in whole blocks.
    /// Default: 1.0
    pub block_seconds: f64,

    /// Fraction of the loudest block an onset must exceed
    /// Default: 0.7
    pub onset_threshold: f64,

    /// BPM reported when fewer than two onsets are found
    /// Default: 120.0
    pub default_bpm: f64,

    /// Sample count analysed per live detection pass
    /// Default: 4096
    pub live_window_size: usize,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            block_seconds: 1.0,
            onset_threshold: 0.7,
            default_bpm: DEFAULT_BPM,
            live_window_size: 4096,
        }
    }
}

/// Beat matcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Next-beat drift above which the follower deck is physically seeked
    /// Default: 50 ms
    pub seek_threshold_ms: f64,

    /// Step used by manual nudge forward/backward
    /// Default: 10 ms
    pub nudge_amount_ms: f64,

    /// Number of taps averaged by tap tempo
    /// Default: 8
    pub tap_window: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            seek_threshold_ms: 50.0,
            nudge_amount_ms: 10.0,
            tap_window: 8,
        }
    }
}

/// Crossfader settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// Curve applied when the crossfader is created
    /// Default: linear
    pub curve: CrossfaderCurve,
}

/// Auto-DJ settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoDjConfig {
    /// Length of the automatic crossfade in beats of the outgoing track
    /// Default: 16 (4 bars)
    pub transition_beats: u32,

    /// Number of discrete crossfader steps per transition
    /// Default: 100
    pub ramp_steps: u32,

    /// Transition starts once the live deck has this many beats left
    /// Default: 32
    pub trigger_beats: f64,

    /// Delay between playback checks
    /// Default: 1000 ms
    pub poll_interval_ms: u64,
}

impl Default for AutoDjConfig {
    fn default() -> Self {
        Self {
            transition_beats: 16,
            ramp_steps: 100,
            trigger_beats: 32.0,
            poll_interval_ms: 1000,
        }
    }
}

impl AutoDjConfig {
    /// Poll cadence as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
