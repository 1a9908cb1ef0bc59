//! Mesh Sync - Beat synchronization and mix orchestration for two decks
//!
//! Leaf to root:
//! - `tempo`: offline and live BPM estimation from decoded samples
//! - `beatgrid`: BPM + phase offset model for one deck
//! - `matcher`: tempo/phase alignment between two grids, tap tempo
//! - `crossfader`: fader position to gain pair under a selectable curve
//! - `autodj`: timed, cancellable automatic transitions

pub mod autodj;
pub mod beatgrid;
pub mod config;
pub mod crossfader;
pub mod deck;
pub mod error;
pub mod matcher;
pub mod tempo;
pub mod types;

pub use autodj::{beats_remaining, AutoDj, AutoDjEvent, AutoDjState, TransitionOutcome, TransitionPlan};
pub use beatgrid::BeatGrid;
pub use crossfader::{crossfade_gains, AtomicGain, Crossfader, CrossfaderCurve, GainControl};
pub use deck::{Capability, Deck, RateAdjustable, Seekable, VirtualDeck};
pub use error::{SyncError, SyncResult};
pub use matcher::{BeatMatcher, MatchState, PhaseCorrection, SyncMode, SyncState, SyncStatus};
pub use tempo::{
    analyze_tempo, estimate_bpm, estimate_bpm_live, normalize_bpm, LiveTempoDetector, TempoEstimate, TempoReading,
};
pub use types::*;
