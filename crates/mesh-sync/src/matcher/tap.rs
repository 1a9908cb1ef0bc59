//! Tap tempo - BPM from a rolling window of manual taps

use std::collections::VecDeque;
use std::time::Instant;

/// Default number of taps kept
pub const DEFAULT_TAP_WINDOW: usize = 8;

/// Bounded ring buffer of tap timestamps (milliseconds)
#[derive(Debug, Clone)]
pub struct TapTempo {
    taps: VecDeque<f64>,
    capacity: usize,
    epoch: Instant,
}

impl TapTempo {
    /// Create an empty buffer holding at most `capacity` taps (minimum 2)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            taps: VecDeque::with_capacity(capacity),
            capacity,
            epoch: Instant::now(),
        }
    }

    /// Register a tap now
    pub fn tap(&mut self) -> Option<f64> {
        let now_ms = self.epoch.elapsed().as_secs_f64() * 1000.0;
        self.tap_at(now_ms)
    }

    /// Register a tap at `timestamp_ms`
    ///
    /// Returns the rounded BPM once two or more taps are buffered. A
    /// timestamp that does not move forward starts a new tap sequence.
    pub fn tap_at(&mut self, timestamp_ms: f64) -> Option<f64> {
        if self.taps.back().is_some_and(|&last| timestamp_ms <= last) {
            self.taps.clear();
        }

        if self.taps.len() == self.capacity {
            self.taps.pop_front();
        }
        self.taps.push_back(timestamp_ms);

        self.bpm()
    }

    /// Current tap tempo, `None` until two taps are buffered
    pub fn bpm(&self) -> Option<f64> {
        let (first, last) = (*self.taps.front()?, *self.taps.back()?);
        if self.taps.len() < 2 {
            return None;
        }
        let average_interval = (last - first) / (self.taps.len() - 1) as f64;
        Some((60_000.0 / average_interval).round())
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn reset(&mut self) {
        self.taps.clear();
    }
}

impl Default for TapTempo {
    fn default() -> Self {
        Self::new(DEFAULT_TAP_WINDOW)
    }
}
