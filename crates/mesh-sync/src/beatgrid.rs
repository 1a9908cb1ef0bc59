//! Beat grid - maps playback time to beat and bar positions for one deck
//!
//! A grid is a constant tempo plus the time of beat zero. Beat numbers are
//! continuous (beat 3.5 is halfway between beats 3 and 4); the `*_beat_time`
//! helpers snap to whole beats and map back to seconds.
//!
//! The grid caches nothing. After `set_bpm`/`set_offset`, previously derived
//! beat times are stale and must be recomputed by the caller.

use crate::error::{SyncError, SyncResult};
use crate::tempo::normalize_bpm;

/// Default beats per bar (4/4)
pub const DEFAULT_BEATS_PER_BAR: u32 = 4;

/// Default tolerance for `is_on_beat`
pub const DEFAULT_ON_BEAT_TOLERANCE_MS: f64 = 50.0;

/// Per-deck tempo model
#[derive(Debug, Clone, PartialEq)]
pub struct BeatGrid {
    /// Tempo, always within [60, 200)
    bpm: f64,
    /// Time of beat zero in seconds
    offset: f64,
    beats_per_bar: u32,
}

impl BeatGrid {
    /// Create a grid; `bpm` is normalized into [60, 200)
    pub fn new(bpm: f64, offset_seconds: f64) -> SyncResult<Self> {
        Ok(Self {
            bpm: checked_bpm(bpm)?,
            offset: offset_seconds,
            beats_per_bar: DEFAULT_BEATS_PER_BAR,
        })
    }

    /// Override beats per bar (values below 1 are treated as 1)
    pub fn with_beats_per_bar(mut self, beats_per_bar: u32) -> Self {
        self.beats_per_bar = beats_per_bar.max(1);
        self
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn beats_per_bar(&self) -> u32 {
        self.beats_per_bar
    }

    /// Duration of one beat in seconds
    #[inline]
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Continuous beat number at `time_seconds`
    #[inline]
    pub fn beat_at(&self, time_seconds: f64) -> f64 {
        (time_seconds - self.offset) / self.seconds_per_beat()
    }

    /// Position within the current beat, in [0, 1)
    pub fn beat_phase(&self, time_seconds: f64) -> f64 {
        self.beat_at(time_seconds).rem_euclid(1.0)
    }

    /// Time of (possibly fractional) beat number `beat`
    #[inline]
    pub fn beat_time(&self, beat: f64) -> f64 {
        self.offset + beat * self.seconds_per_beat()
    }

    pub fn nearest_beat_time(&self, time_seconds: f64) -> f64 {
        self.beat_time(self.beat_at(time_seconds).round())
    }

    /// First beat at or after `time_seconds`
    pub fn next_beat_time(&self, time_seconds: f64) -> f64 {
        self.beat_time(self.beat_at(time_seconds).ceil())
    }

    /// Last beat at or before `time_seconds`
    pub fn previous_beat_time(&self, time_seconds: f64) -> f64 {
        self.beat_time(self.beat_at(time_seconds).floor())
    }

    /// Whether `time_seconds` lies within `tolerance_ms` of the nearest beat
    pub fn is_on_beat(&self, time_seconds: f64, tolerance_ms: f64) -> bool {
        let diff_ms = (time_seconds - self.nearest_beat_time(time_seconds)).abs() * 1000.0;
        diff_ms <= tolerance_ms
    }

    /// `is_on_beat` with the default 50 ms tolerance
    pub fn is_on_beat_default(&self, time_seconds: f64) -> bool {
        self.is_on_beat(time_seconds, DEFAULT_ON_BEAT_TOLERANCE_MS)
    }

    /// Bar number at `time_seconds` (negative before beat zero)
    pub fn bar_at(&self, time_seconds: f64) -> i64 {
        (self.beat_at(time_seconds) / self.beats_per_bar as f64).floor() as i64
    }

    /// Change tempo; the new value is normalized into [60, 200)
    pub fn set_bpm(&mut self, bpm: f64) -> SyncResult<()> {
        self.bpm = checked_bpm(bpm)?;
        Ok(())
    }

    /// Move beat zero
    pub fn set_offset(&mut self, offset_seconds: f64) {
        self.offset = offset_seconds;
    }
}

fn checked_bpm(bpm: f64) -> SyncResult<f64> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(SyncError::InvalidBpm(bpm));
    }
    Ok(normalize_bpm(bpm))
}
