//! Crossfader - blends deck A and deck B
//!
//! Position runs from -1.0 (deck A only) through 0.0 (centre) to 1.0
//! (deck B only). The curve decides how that position becomes a gain pair:
//!
//! - `Linear`: gains sum to 1, with an audible dip at the centre
//! - `ConstantPower`: cos/sin pairing, `gain_a² + gain_b² = 1` everywhere
//! - `Cut`: hard switch at the centre, for scratch-style cuts
//!
//! Any change to position or curve is pushed to both gain sinks at once.

use std::f32::consts::FRAC_PI_2;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::MixerConfig;
use crate::error::SyncError;

/// Fader curve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossfaderCurve {
    #[default]
    Linear,
    ConstantPower,
    Cut,
}

impl CrossfaderCurve {
    pub const ALL: [CrossfaderCurve; 3] = [
        CrossfaderCurve::Linear,
        CrossfaderCurve::ConstantPower,
        CrossfaderCurve::Cut,
    ];

    /// Name used in config files and by the UI
    pub fn name(&self) -> &'static str {
        match self {
            CrossfaderCurve::Linear => "linear",
            CrossfaderCurve::ConstantPower => "constant-power",
            CrossfaderCurve::Cut => "cut",
        }
    }
}

impl FromStr for CrossfaderCurve {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CrossfaderCurve::ALL
            .into_iter()
            .find(|curve| curve.name() == s)
            .ok_or_else(|| SyncError::UnknownCurve(s.to_string()))
    }
}

impl std::fmt::Display for CrossfaderCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Gains for `position` under `curve`; position is clamped to [-1, 1]
pub fn crossfade_gains(position: f32, curve: CrossfaderCurve) -> (f32, f32) {
    let position = position.clamp(-1.0, 1.0);
    let normalized = (position + 1.0) / 2.0;

    match curve {
        CrossfaderCurve::Linear => (1.0 - normalized, normalized),
        CrossfaderCurve::ConstantPower => {
            ((normalized * FRAC_PI_2).cos(), (normalized * FRAC_PI_2).sin())
        }
        CrossfaderCurve::Cut => (
            if position < 0.0 { 1.0 } else { 0.0 },
            if position > 0.0 { 1.0 } else { 0.0 },
        ),
    }
}

/// Gain control owned by the audio graph (e.g. a channel volume stage)
pub trait GainControl: Send + Sync {
    fn set_gain(&self, gain: f32);
}

/// Lock-free gain cell written by the crossfader and read by the audio thread
///
/// Starts at unity gain.
pub struct AtomicGain(AtomicU32);

impl AtomicGain {
    pub fn new(gain: f32) -> Self {
        Self(AtomicU32::new(gain.to_bits()))
    }

    #[inline]
    pub fn gain(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }
}

impl Default for AtomicGain {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl GainControl for AtomicGain {
    fn set_gain(&self, gain: f32) {
        self.0.store(gain.to_bits(), Ordering::Relaxed);
    }
}

/// Crossfader state applied to two external gain controls
pub struct Crossfader {
    gain_a: Arc<dyn GainControl>,
    gain_b: Arc<dyn GainControl>,
    position: f32,
    curve: CrossfaderCurve,
}

impl Crossfader {
    /// Create a centred linear crossfader and apply its gains
    pub fn new(gain_a: Arc<dyn GainControl>, gain_b: Arc<dyn GainControl>) -> Self {
        Self::with_curve(gain_a, gain_b, CrossfaderCurve::default())
    }

    /// Create a centred crossfader with a specific curve
    pub fn with_curve(
        gain_a: Arc<dyn GainControl>,
        gain_b: Arc<dyn GainControl>,
        curve: CrossfaderCurve,
    ) -> Self {
        let fader = Self {
            gain_a,
            gain_b,
            position: 0.0,
            curve,
        };
        fader.apply();
        fader
    }

    /// Create a centred crossfader with the configured curve
    pub fn from_config(
        gain_a: Arc<dyn GainControl>,
        gain_b: Arc<dyn GainControl>,
        config: &MixerConfig,
    ) -> Self {
        Self::with_curve(gain_a, gain_b, config.curve)
    }

    /// Move the fader (clamped to [-1, 1]) and apply gains
    pub fn set_position(&mut self, position: f32) {
        self.position = if position.is_nan() { 0.0 } else { position.clamp(-1.0, 1.0) };
        self.apply();
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Change curve and reapply gains at the current position
    pub fn set_curve(&mut self, curve: CrossfaderCurve) {
        self.curve = curve;
        self.apply();
    }

    /// Change curve by name; unknown names leave the fader untouched
    pub fn set_curve_by_name(&mut self, name: &str) -> Result<(), SyncError> {
        let curve = name.parse::<CrossfaderCurve>().map_err(|e| {
            log::warn!("Crossfader: {}", e);
            e
        })?;
        self.set_curve(curve);
        Ok(())
    }

    pub fn curve(&self) -> CrossfaderCurve {
        self.curve
    }

    /// Gains currently applied (A, B)
    pub fn gains(&self) -> (f32, f32) {
        crossfade_gains(self.position, self.curve)
    }

    /// 50/50 blend
    pub fn center(&mut self) {
        self.set_position(0.0);
    }

    pub fn to_a(&mut self) {
        self.set_position(-1.0);
    }

    pub fn to_b(&mut self) {
        self.set_position(1.0);
    }

    fn apply(&self) {
        let (gain_a, gain_b) = self.gains();
        self.gain_a.set_gain(gain_a);
        self.gain_b.set_gain(gain_b);
    }
}

impl std::fmt::Debug for Crossfader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crossfader")
            .field("position", &self.position)
            .field("curve", &self.curve)
            .finish()
    }
}
