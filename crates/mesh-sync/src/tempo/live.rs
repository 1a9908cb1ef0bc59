//! Live BPM detection from short capture windows
//!
//! Autocorrelation of the time-domain window; the strongest correlation
//! peak (not necessarily the first) is taken as the beat period.

use rayon::prelude::*;
use serde::Serialize;

use super::normalize_bpm;
use crate::config::TempoConfig;
use crate::types::Sample;

/// Confidence attached to every accepted live reading
///
/// Not derived from peak sharpness.
pub const LIVE_CONFIDENCE: f64 = 0.8;

/// A live tempo reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TempoReading {
    pub bpm: f64,
    pub confidence: f64,
}

/// Normalized autocorrelation for lags `0..window.len() / 2`
///
/// Each lag sums over the first half of the window and is divided by the
/// lag-0 energy, so lag 0 is 1.0 for any non-silent window. A silent window
/// yields all zeros.
pub fn autocorrelation(window: &[Sample]) -> Vec<f64> {
    let max_lag = window.len() / 2;
    let mut correlations: Vec<f64> = (0..max_lag)
        .into_par_iter()
        .map(|lag| {
            window[..max_lag]
                .iter()
                .zip(&window[lag..lag + max_lag])
                .map(|(&a, &b)| a as f64 * b as f64)
                .sum()
        })
        .collect();

    if let Some(&energy) = correlations.first() {
        if energy > 0.0 {
            for c in correlations.iter_mut() {
                *c /= energy;
            }
        }
    }
    correlations
}

/// Estimate BPM from one capture window
///
/// Returns `None` when the correlation curve has fewer than two peaks (no
/// periodicity to speak of).
pub fn estimate_bpm_live(window: &[Sample], sample_rate: u32) -> Option<TempoReading> {
    if sample_rate == 0 {
        return None;
    }
    let correlations = autocorrelation(window);
    if correlations.len() < 3 {
        return None;
    }

    let peaks: Vec<(usize, f64)> = (1..correlations.len() - 1)
        .filter(|&i| correlations[i] > correlations[i - 1] && correlations[i] > correlations[i + 1])
        .map(|i| (i, correlations[i]))
        .collect();

    if peaks.len() < 2 {
        return None;
    }

    // Strongest peak; earlier lag wins a tie
    let (lag, _) = peaks
        .iter()
        .copied()
        .fold(peaks[0], |best, peak| if peak.1 > best.1 { peak } else { best });

    let seconds_per_beat = lag as f64 / sample_rate as f64;
    let bpm = normalize_bpm(60.0 / seconds_per_beat).round();
    if !bpm.is_finite() || bpm <= 0.0 {
        return None;
    }

    Some(TempoReading {
        bpm,
        confidence: LIVE_CONFIDENCE,
    })
}

/// Stateful live detector fed from a capture stream
///
/// Keeps the last accepted reading; windows without a detection leave it
/// untouched.
#[derive(Debug, Clone)]
pub struct LiveTempoDetector {
    sample_rate: u32,
    window_size: usize,
    bpm: f64,
    confidence: f64,
}

impl LiveTempoDetector {
    /// Create a detector analysing `window_size` samples at a time
    pub fn new(sample_rate: u32, window_size: usize) -> Self {
        Self {
            sample_rate,
            window_size,
            bpm: 0.0,
            confidence: 0.0,
        }
    }

    /// Create a detector using the configured live window size
    pub fn from_config(sample_rate: u32, config: &TempoConfig) -> Self {
        Self::new(sample_rate, config.live_window_size)
    }

    /// Analyse the most recent `window_size` samples of `samples`
    pub fn analyze(&mut self, samples: &[Sample]) -> TempoReading {
        let start = samples.len().saturating_sub(self.window_size);
        if let Some(reading) = estimate_bpm_live(&samples[start..], self.sample_rate) {
            if reading.bpm > 0.0 {
                if (reading.bpm - self.bpm).abs() >= 1.0 {
                    log::debug!("LiveTempoDetector: {:.0} BPM", reading.bpm);
                }
                self.bpm = reading.bpm;
                self.confidence = reading.confidence;
            }
        }
        self.reading()
    }

    /// Last accepted reading (0 BPM before the first detection)
    pub fn reading(&self) -> TempoReading {
        TempoReading {
            bpm: self.bpm,
            confidence: self.confidence,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Forget the last reading
    pub fn reset(&mut self) {
        self.bpm = 0.0;
        self.confidence = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_train(len: usize, period: usize) -> Vec<Sample> {
        (0..len).map(|i| if i % period == 0 { 1.0 } else { 0.0 }).collect()
    }

    #[test]
    fn test_autocorrelation_normalized() {
        let window = impulse_train(64, 8);
        let corr = autocorrelation(&window);
        assert_eq!(corr.len(), 32);
        assert!((corr[0] - 1.0).abs() < 1e-12);
        assert!((corr[8] - 1.0).abs() < 1e-12);
        assert_eq!(corr[3], 0.0);
    }

    #[test]
    fn test_impulse_train_half_second() {
        // 1 kHz, pulse every 500 samples = 0.5 s per beat
        let window = impulse_train(2048, 500);
        let reading = estimate_bpm_live(&window, 1000).unwrap();
        assert_eq!(reading.bpm, 120.0);
        assert_eq!(reading.confidence, LIVE_CONFIDENCE);
    }

    #[test]
    fn test_silence_has_no_reading() {
        assert!(estimate_bpm_live(&[0.0; 4096], 44100).is_none());
        assert!(estimate_bpm_live(&[], 44100).is_none());
    }

    #[test]
    fn test_detector_keeps_last_reading() {
        let mut detector = LiveTempoDetector::new(1000, 2048);
        assert_eq!(detector.bpm(), 0.0);

        let reading = detector.analyze(&impulse_train(2048, 500));
        assert_eq!(reading.bpm, 120.0);

        // Silence does not clear the previous detection
        let reading = detector.analyze(&[0.0; 2048]);
        assert_eq!(reading.bpm, 120.0);
        assert_eq!(detector.confidence(), LIVE_CONFIDENCE);

        detector.reset();
        assert_eq!(detector.bpm(), 0.0);
        assert_eq!(detector.confidence(), 0.0);
    }

    #[test]
    fn test_detector_uses_most_recent_window() {
        let mut detector = LiveTempoDetector::new(1000, 2048);
        let mut stream = vec![0.0; 5000];
        stream.extend(impulse_train(2048, 500));
        assert_eq!(detector.analyze(&stream).bpm, 120.0);
    }

    #[test]
    fn test_detector_from_config_window() {
        let config = TempoConfig {
            live_window_size: 2048,
            ..TempoConfig::default()
        };
        let mut detector = LiveTempoDetector::from_config(1000, &config);
        assert_eq!(detector.window_size(), 2048);

        // Only the trailing 2048 samples are analysed; the slow pulses before them are ignored
        let mut stream = impulse_train(6000, 1500);
        stream.extend(impulse_train(2048, 500));
        assert_eq!(detector.analyze(&stream).bpm, 120.0);

        let default = LiveTempoDetector::from_config(44100, &TempoConfig::default());
        assert_eq!(default.window_size(), 4096);
    }
}
