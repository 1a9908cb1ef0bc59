//! Crossfade ramp for one automatic transition

use std::time::Duration;

use crate::types::{DeckSide, DEFAULT_BPM};

/// Beats left before the end of a track
///
/// `(duration - current) / 60 × bpm`, never negative.
pub fn beats_remaining(duration: f64, current_time: f64, bpm: f64) -> f64 {
    ((duration - current_time).max(0.0) / 60.0) * bpm
}

/// Discrete crossfader ramp from one deck to the other
///
/// Step `0` sits on the outgoing deck's end stop and step `total_steps` on
/// the incoming deck's; steps are `step_duration` apart.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub from: DeckSide,
    pub to: DeckSide,
    pub start_position: f32,
    pub end_position: f32,
    pub total_steps: u32,
    pub step_duration: Duration,
}

impl TransitionPlan {
    /// Plan a transition lasting `transition_beats` beats at `bpm`
    ///
    /// A non-positive BPM falls back to the default tempo; `steps` is at
    /// least 1.
    pub fn new(from: DeckSide, transition_beats: u32, bpm: f64, steps: u32) -> Self {
        let bpm = if bpm.is_finite() && bpm > 0.0 { bpm } else { DEFAULT_BPM };
        let total_steps = steps.max(1);
        let total_ms = transition_beats as f64 * 60.0 / bpm * 1000.0;
        let step_ms = total_ms / total_steps as f64;

        Self {
            from,
            to: from.other(),
            start_position: from.fader_position(),
            end_position: from.other().fader_position(),
            total_steps,
            step_duration: Duration::from_nanos((step_ms * 1_000_000.0).round() as u64),
        }
    }

    /// Fader position at `step` (clamped to the last step)
    pub fn position_at(&self, step: u32) -> f32 {
        let progress = step.min(self.total_steps) as f32 / self.total_steps as f32;
        self.start_position + (self.end_position - self.start_position) * progress
    }

    /// Wall-clock length of the whole ramp
    pub fn total_duration(&self) -> Duration {
        self.step_duration * self.total_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beats_remaining_at_185_3_of_200s_is_under_32() {
        let beats = beats_remaining(200.0, 185.3, 130.0);
        assert!((beats - 31.85).abs() < 0.01);
        assert!(beats <= 32.0);
        assert_eq!(beats_remaining(200.0, 210.0, 130.0), 0.0);
    }

    #[test]
    fn test_step_duration() {
        // 16 beats at 120 BPM = 8 s over 100 steps
        let plan = TransitionPlan::new(DeckSide::A, 16, 120.0, 100);
        assert_eq!(plan.step_duration, Duration::from_millis(80));
        assert_eq!(plan.total_duration(), Duration::from_secs(8));
    }

    #[test]
    fn test_ramp_direction() {
        let plan = TransitionPlan::new(DeckSide::A, 16, 128.0, 100);
        assert_eq!(plan.to, DeckSide::B);
        assert_eq!(plan.position_at(0), -1.0);
        assert_eq!(plan.position_at(50), 0.0);
        assert_eq!(plan.position_at(100), 1.0);
        assert_eq!(plan.position_at(500), 1.0);

        let back = TransitionPlan::new(DeckSide::B, 16, 128.0, 100);
        assert_eq!(back.position_at(0), 1.0);
        assert_eq!(back.position_at(100), -1.0);
    }

    #[test]
    fn test_ramp_is_monotonic() {
        let plan = TransitionPlan::new(DeckSide::A, 16, 128.0, 100);
        for step in 1..=plan.total_steps {
            assert!(plan.position_at(step) > plan.position_at(step - 1));
        }
    }

    #[test]
    fn test_invalid_bpm_uses_default() {
        let plan = TransitionPlan::new(DeckSide::A, 16, 0.0, 0);
        assert_eq!(plan.total_steps, 1);
        assert_eq!(plan.step_duration, Duration::from_secs(8));
    }
}
