//! Offline BPM detection from block energy onsets
//!
//! The decoded signal is cut into fixed-length blocks, each reduced to its
//! RMS energy. Blocks that are strict local maxima above a fraction of the
//! loudest block count as onsets, and the most frequent onset spacing is
//! taken as the beat period.

use rayon::prelude::*;
use serde::Serialize;

use super::normalize_bpm;
use crate::config::TempoConfig;
use crate::types::Sample;

/// Result of an offline tempo analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TempoEstimate {
    /// Detected (or fallback) BPM, normalized and rounded
    pub bpm: f64,
    /// Number of onset blocks found
    pub onset_count: usize,
    /// True when `bpm` is the configured default rather than a detection
    pub is_fallback: bool,
}

impl TempoEstimate {
    fn fallback(config: &TempoConfig, onset_count: usize) -> Self {
        Self {
            bpm: config.default_bpm,
            onset_count,
            is_fallback: true,
        }
    }
}

/// Detect BPM using default settings
///
/// Returns the default 120 BPM when nothing usable is found; use
/// [`analyze_tempo`] to tell a fallback from a detection.
pub fn estimate_bpm(samples: &[Sample], sample_rate: u32) -> f64 {
    analyze_tempo(samples, sample_rate, &TempoConfig::default()).bpm
}

/// Detect BPM and report how it was obtained
pub fn analyze_tempo(samples: &[Sample], sample_rate: u32, config: &TempoConfig) -> TempoEstimate {
    let block_len = (sample_rate as f64 * config.block_seconds).round();
    if samples.is_empty() || !block_len.is_finite() || block_len < 1.0 {
        log::debug!(
            "analyze_tempo: nothing to analyse ({} samples, block {}), using {} BPM",
            samples.len(),
            block_len,
            config.default_bpm
        );
        return TempoEstimate::fallback(config, 0);
    }

    let energies = block_energies(samples, block_len as usize);
    let onsets = find_onsets(&energies, config.onset_threshold);

    if onsets.len() < 2 {
        log::debug!(
            "analyze_tempo: {} onsets in {} blocks, using {} BPM",
            onsets.len(),
            energies.len(),
            config.default_bpm
        );
        return TempoEstimate::fallback(config, onsets.len());
    }

    let Some(interval_blocks) = most_common_interval(&onsets) else {
        return TempoEstimate::fallback(config, onsets.len());
    };

    let seconds_per_beat = interval_blocks as f64 * config.block_seconds;
    let bpm = normalize_bpm(60.0 / seconds_per_beat).round();

    log::info!(
        "analyze_tempo: {:.0} BPM from {} onsets (interval {} blocks)",
        bpm,
        onsets.len(),
        interval_blocks
    );

    TempoEstimate {
        bpm,
        onset_count: onsets.len(),
        is_fallback: false,
    }
}

/// RMS energy of each `block_len`-sample block (the last block may be short)
pub fn block_energies(samples: &[Sample], block_len: usize) -> Vec<f64> {
    if block_len == 0 {
        return Vec::new();
    }
    samples.par_chunks(block_len).map(rms).collect()
}

fn rms(block: &[Sample]) -> f64 {
    if block.is_empty() {
        return 0.0;
    }
    let sum: f64 = block.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / block.len() as f64).sqrt()
}

/// Indices of blocks louder than both neighbours and above `threshold × max`
///
/// The first and last blocks are never onsets. A silent signal has no
/// onsets.
pub fn find_onsets(energies: &[f64], threshold: f64) -> Vec<usize> {
    if energies.len() < 3 {
        return Vec::new();
    }

    let max_energy = energies.iter().copied().fold(0.0_f64, f64::max);
    if max_energy <= 0.0 {
        return Vec::new();
    }
    let min_energy = max_energy * threshold;

    (1..energies.len() - 1)
        .filter(|&i| {
            energies[i] > energies[i - 1] && energies[i] > energies[i + 1] && energies[i] > min_energy
        })
        .collect()
}

/// Most frequent spacing between successive onsets; ties go to the first seen
fn most_common_interval(onsets: &[usize]) -> Option<usize> {
    // (interval, count) in first-seen order
    let mut counts: Vec<(usize, usize)> = Vec::new();
    for pair in onsets.windows(2) {
        let interval = pair[1].saturating_sub(pair[0]);
        if interval == 0 {
            continue;
        }
        match counts.iter_mut().find(|(i, _)| *i == interval) {
            Some(entry) => entry.1 += 1,
            None => counts.push((interval, 1)),
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for &(interval, count) in &counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((interval, count));
        }
    }
    best.map(|(interval, _)| interval)
}
