//! Tempo estimation
//!
//! Two estimators share one normalization rule:
//! - `offline`: block energy onsets over a fully decoded track
//! - `live`: autocorrelation over a short capture window

mod live;
mod offline;

pub use live::{autocorrelation, estimate_bpm_live, LiveTempoDetector, TempoReading, LIVE_CONFIDENCE};
pub use offline::{analyze_tempo, block_energies, estimate_bpm, find_onsets, TempoEstimate};

use crate::types::{MAX_BPM, MIN_BPM};

/// Fold a BPM into [MIN_BPM, MAX_BPM) by doubling or halving
///
/// Detections an octave apart (e.g. 64 and 128) become comparable.
/// Non-positive or non-finite input is returned unchanged; callers reject it.
pub fn normalize_bpm(bpm: f64) -> f64 {
    if !bpm.is_finite() || bpm <= 0.0 {
        return bpm;
    }
    let mut bpm = bpm;
    while bpm < MIN_BPM {
        bpm *= 2.0;
    }
    while bpm >= MAX_BPM {
        bpm /= 2.0;
    }
    bpm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_into_range() {
        for bpm in [0.5, 7.0, 30.0, 59.9, 60.0, 128.0, 199.9, 200.0, 256.0, 1300.0, 44100.0] {
            let n = normalize_bpm(bpm);
            assert!((MIN_BPM..MAX_BPM).contains(&n), "{} normalized to {}", bpm, n);
        }
    }

    #[test]
    fn test_normalize_octaves() {
        assert_eq!(normalize_bpm(30.0), 60.0);
        assert_eq!(normalize_bpm(64.0), 64.0);
        assert_eq!(normalize_bpm(256.0), 128.0);
        assert_eq!(normalize_bpm(200.0), 100.0);
    }

    #[test]
    fn test_normalize_idempotent() {
        for bpm in [12.5, 87.0, 174.0, 333.0] {
            let once = normalize_bpm(bpm);
            assert_eq!(normalize_bpm(once), once);
        }
    }

    #[test]
    fn test_normalize_rejects_invalid_unchanged() {
        assert_eq!(normalize_bpm(0.0), 0.0);
        assert_eq!(normalize_bpm(-10.0), -10.0);
        assert!(normalize_bpm(f64::NAN).is_nan());
    }
}
