//! Beat matcher - aligns deck B to deck A
//!
//! Deck A is the tempo master. Synchronization happens in two stages:
//!
//! ```text
//! Unsynced --sync_tempo--> TempoSynced --align_beats--> PhaseAligned
//!     ^                                                      |
//!     +------------------------- unsync --------------------+
//! ```
//!
//! `auto_sync` runs both stages and marks the mode `Auto`.
//!
//! Every correction is applied twice: to deck B's beat grid (so future beat
//! predictions stay right) and, when the deck supports it, to the physical
//! transport via `RateAdjustable` / `Seekable`. A deck without those
//! capabilities still gets the model update.

mod tap;

pub use tap::{TapTempo, DEFAULT_TAP_WINDOW};

use std::sync::Arc;

use serde::Serialize;

use crate::beatgrid::BeatGrid;
use crate::config::MatcherConfig;
use crate::deck::Deck;
use crate::error::{SyncError, SyncResult};
use crate::types::DeckSide;

/// BPM difference at which the tempo score reaches zero
pub const TEMPO_SCORE_RANGE_BPM: f64 = 10.0;

/// Weight of the tempo score in the combined quality
pub const TEMPO_WEIGHT: f64 = 0.6;

/// Weight of the phase score in the combined quality
pub const PHASE_WEIGHT: f64 = 0.4;

/// Synchronization stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncState {
    #[default]
    Unsynced,
    TempoSynced,
    PhaseAligned,
}

/// Who performed the last synchronization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    #[default]
    Manual,
    Auto,
}

/// Match quality breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchState {
    pub tempo_score: f64,
    pub phase_score: f64,
    pub combined_score: f64,
    pub synced: bool,
    pub mode: SyncMode,
}

/// Snapshot for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SyncStatus {
    pub synced: bool,
    pub mode: SyncMode,
    pub quality: f64,
    pub quality_percent: u8,
    pub bpm_a: f64,
    pub bpm_b: f64,
    pub bpm_diff: f64,
}

/// Outcome of `align_beats`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseCorrection {
    /// Seconds added to deck B's grid offset
    pub phase_offset: f64,
    /// Seconds deck B was physically moved, if a seek was issued
    pub nudge: Option<f64>,
}

/// Two-deck tempo and phase synchronizer
pub struct BeatMatcher {
    deck_a: Arc<dyn Deck>,
    deck_b: Arc<dyn Deck>,
    grid_a: Option<BeatGrid>,
    grid_b: Option<BeatGrid>,
    state: SyncState,
    mode: SyncMode,
    taps: TapTempo,
    config: MatcherConfig,
}

impl BeatMatcher {
    /// Create a matcher with default settings and no grids
    pub fn new(deck_a: Arc<dyn Deck>, deck_b: Arc<dyn Deck>) -> Self {
        Self::with_config(deck_a, deck_b, MatcherConfig::default())
    }

    pub fn with_config(deck_a: Arc<dyn Deck>, deck_b: Arc<dyn Deck>, config: MatcherConfig) -> Self {
        Self {
            deck_a,
            deck_b,
            grid_a: None,
            grid_b: None,
            state: SyncState::Unsynced,
            mode: SyncMode::Manual,
            taps: TapTempo::new(config.tap_window),
            config,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Grids
    // ─────────────────────────────────────────────────────────────

    /// Create both grids at once
    pub fn init_beat_grids(&mut self, bpm_a: f64, bpm_b: f64, offset_a: f64, offset_b: f64) -> SyncResult<()> {
        let grid_a = BeatGrid::new(bpm_a, offset_a)?;
        let grid_b = BeatGrid::new(bpm_b, offset_b)?;
        self.grid_a = Some(grid_a);
        self.grid_b = Some(grid_b);
        Ok(())
    }

    /// Install a grid for one deck (e.g. after loading a new track)
    ///
    /// Replacing a grid invalidates any previous synchronization.
    pub fn set_grid(&mut self, side: DeckSide, grid: BeatGrid) {
        *self.grid_slot(side) = Some(grid);
        self.reset_sync_state();
    }

    /// Drop a deck's grid (track unloaded)
    pub fn clear_grid(&mut self, side: DeckSide) {
        *self.grid_slot(side) = None;
        self.reset_sync_state();
    }

    pub fn grid(&self, side: DeckSide) -> Option<&BeatGrid> {
        match side {
            DeckSide::A => self.grid_a.as_ref(),
            DeckSide::B => self.grid_b.as_ref(),
        }
    }

    /// Manual tempo edit (tap tempo result, pitch fader)
    pub fn set_bpm(&mut self, side: DeckSide, bpm: f64) -> SyncResult<()> {
        match self.grid_slot(side) {
            Some(grid) => grid.set_bpm(bpm),
            None => Err(SyncError::GridsNotInitialized),
        }
    }

    /// Manual phase edit (grid nudge)
    pub fn set_offset(&mut self, side: DeckSide, offset_seconds: f64) -> SyncResult<()> {
        match self.grid_slot(side) {
            Some(grid) => {
                grid.set_offset(offset_seconds);
                Ok(())
            }
            None => Err(SyncError::GridsNotInitialized),
        }
    }

    fn grid_slot(&mut self, side: DeckSide) -> &mut Option<BeatGrid> {
        match side {
            DeckSide::A => &mut self.grid_a,
            DeckSide::B => &mut self.grid_b,
        }
    }

    fn grids_mut(&mut self) -> SyncResult<(&BeatGrid, &mut BeatGrid)> {
        match (self.grid_a.as_ref(), self.grid_b.as_mut()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => {
                log::warn!("BeatMatcher: beat grids not initialized");
                Err(SyncError::GridsNotInitialized)
            }
        }
    }

    fn deck(&self, side: DeckSide) -> &Arc<dyn Deck> {
        match side {
            DeckSide::A => &self.deck_a,
            DeckSide::B => &self.deck_b,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Synchronization
    // ─────────────────────────────────────────────────────────────

    /// Match deck B's tempo to deck A
    ///
    /// Returns the playback rate deck B needs (target / native BPM). The
    /// rate is pushed to the deck only if it supports rate control.
    pub fn sync_tempo(&mut self) -> SyncResult<f64> {
        let deck_b = Arc::clone(&self.deck_b);
        let (grid_a, grid_b) = self.grids_mut()?;

        let target_bpm = grid_a.bpm();
        let original_bpm = match deck_b.bpm() {
            bpm if bpm.is_finite() && bpm > 0.0 => bpm,
            _ => grid_b.bpm(),
        };
        grid_b.set_bpm(target_bpm)?;

        let playback_rate = target_bpm / original_bpm;
        match deck_b.as_rate_adjustable() {
            Some(transport) => transport.set_playback_rate(playback_rate),
            None => log::debug!("BeatMatcher: deck B has no rate control, grid updated only"),
        }

        log::info!(
            "BeatMatcher: tempo synced {:.2} -> {:.2} BPM (rate {:.4})",
            original_bpm,
            target_bpm,
            playback_rate
        );
        self.state = SyncState::TempoSynced;
        Ok(playback_rate)
    }

    /// Align deck B's beats to deck A's
    ///
    /// The nearest-beat difference is folded into deck B's grid offset.
    /// If the next beats still differ by more than the seek threshold and
    /// deck B is seekable, deck B is also moved by that difference.
    pub fn align_beats(&mut self, time_a: f64, time_b: f64) -> SyncResult<PhaseCorrection> {
        let deck_b = Arc::clone(&self.deck_b);
        let seek_threshold = self.config.seek_threshold_ms / 1000.0;
        let (grid_a, grid_b) = self.grids_mut()?;

        let nearest_a = grid_a.nearest_beat_time(time_a);
        let nearest_b = grid_b.nearest_beat_time(time_b);
        let phase_offset = nearest_a - nearest_b;
        grid_b.set_offset(grid_b.offset() + phase_offset);

        let next_a = grid_a.next_beat_time(time_a);
        let next_b = grid_b.next_beat_time(time_b);
        let drift = next_a - next_b;

        let mut nudge = None;
        if drift.abs() > seek_threshold {
            if let Some(transport) = deck_b.as_seekable() {
                transport.seek(time_b + drift);
                nudge = Some(drift);
            }
        }

        log::debug!(
            "BeatMatcher: phase offset {:+.4}s, next-beat drift {:+.4}s, nudged: {}",
            phase_offset,
            drift,
            nudge.is_some()
        );
        self.state = SyncState::PhaseAligned;
        Ok(PhaseCorrection { phase_offset, nudge })
    }

    /// Tempo sync followed by phase alignment
    pub fn auto_sync(&mut self, time_a: f64, time_b: f64) -> SyncResult<PhaseCorrection> {
        self.sync_tempo()?;
        let correction = self.align_beats(time_a, time_b)?;
        self.mode = SyncMode::Auto;
        Ok(correction)
    }

    /// Back to `Unsynced`, manual mode
    pub fn unsync(&mut self) {
        self.reset_sync_state();
    }

    fn reset_sync_state(&mut self) {
        self.state = SyncState::Unsynced;
        self.mode = SyncMode::Manual;
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn is_synced(&self) -> bool {
        self.state != SyncState::Unsynced
    }

    // ─────────────────────────────────────────────────────────────
    // Quality
    // ─────────────────────────────────────────────────────────────

    /// Tempo, phase and combined scores at the given playback times
    ///
    /// All scores are 0 while either grid is missing.
    pub fn match_state(&self, time_a: f64, time_b: f64) -> MatchState {
        let (tempo_score, phase_score) = match (&self.grid_a, &self.grid_b) {
            (Some(a), Some(b)) => {
                let bpm_diff = (a.bpm() - b.bpm()).abs();
                let tempo = (1.0 - bpm_diff / TEMPO_SCORE_RANGE_BPM).max(0.0);
                let phase_diff = (a.beat_phase(time_a) - b.beat_phase(time_b)).abs();
                let phase = (1.0 - phase_diff).max(0.0);
                (tempo, phase)
            }
            _ => (0.0, 0.0),
        };

        MatchState {
            tempo_score,
            phase_score,
            combined_score: TEMPO_WEIGHT * tempo_score + PHASE_WEIGHT * phase_score,
            synced: self.is_synced(),
            mode: self.mode,
        }
    }

    /// Combined match quality in [0, 1]
    pub fn beat_match_quality(&self, time_a: f64, time_b: f64) -> f64 {
        self.match_state(time_a, time_b).combined_score
    }

    pub fn sync_status(&self, time_a: f64, time_b: f64) -> SyncStatus {
        let quality = self.beat_match_quality(time_a, time_b);
        let bpm_a = self.grid_a.as_ref().map_or(0.0, BeatGrid::bpm);
        let bpm_b = self.grid_b.as_ref().map_or(0.0, BeatGrid::bpm);

        SyncStatus {
            synced: self.is_synced(),
            mode: self.mode,
            quality,
            quality_percent: (quality * 100.0).round().clamp(0.0, 100.0) as u8,
            bpm_a,
            bpm_b,
            bpm_diff: (bpm_a - bpm_b).abs(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Manual controls
    // ─────────────────────────────────────────────────────────────

    /// Register a tap now; `None` until two taps are buffered
    pub fn tap_tempo(&mut self) -> Option<f64> {
        self.taps.tap()
    }

    /// Register a tap at an explicit timestamp (milliseconds)
    pub fn tap_tempo_at(&mut self, timestamp_ms: f64) -> Option<f64> {
        self.taps.tap_at(timestamp_ms)
    }

    pub fn reset_tap_tempo(&mut self) {
        self.taps.reset();
    }

    /// Move a deck forward by `amount_ms`; no-op if it cannot seek
    pub fn nudge_forward(&self, side: DeckSide, amount_ms: f64) {
        let deck = self.deck(side);
        if let Some(transport) = deck.as_seekable() {
            transport.seek(deck.current_time() + amount_ms / 1000.0);
        }
    }

    /// Move a deck back by `amount_ms` (not before 0); no-op if it cannot seek
    pub fn nudge_backward(&self, side: DeckSide, amount_ms: f64) {
        let deck = self.deck(side);
        if let Some(transport) = deck.as_seekable() {
            transport.seek((deck.current_time() - amount_ms / 1000.0).max(0.0));
        }
    }

    /// `nudge_forward` by the configured step
    pub fn nudge_forward_default(&self, side: DeckSide) {
        self.nudge_forward(side, self.config.nudge_amount_ms);
    }

    /// `nudge_backward` by the configured step
    pub fn nudge_backward_default(&self, side: DeckSide) {
        self.nudge_backward(side, self.config.nudge_amount_ms);
    }
}

impl std::fmt::Debug for BeatMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeatMatcher")
            .field("grid_a", &self.grid_a)
            .field("grid_b", &self.grid_b)
            .field("state", &self.state)
            .field("mode", &self.mode)
            .finish()
    }
}
