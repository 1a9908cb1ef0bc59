//! Common types for Mesh Sync
//!
//! Deck identifiers and the tempo constants shared by the analysis and
//! synchronization modules.

use serde::{Deserialize, Serialize};

/// Audio sample type (32-bit float PCM, already decoded)
pub type Sample = f32;

/// Default sample rate assumed when none is supplied (44.1kHz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Lower bound of the normalized BPM range (inclusive)
pub const MIN_BPM: f64 = 60.0;

/// Upper bound of the normalized BPM range (exclusive)
pub const MAX_BPM: f64 = 200.0;

/// Tempo reported when detection has nothing to work with
pub const DEFAULT_BPM: f64 = 120.0;

/// Number of decks the engine synchronizes
pub const NUM_DECKS: usize = 2;

/// One of the two decks
///
/// Deck A is the tempo master for synchronization; deck B follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckSide {
    A,
    B,
}

impl DeckSide {
    /// Both sides in order
    pub const ALL: [DeckSide; NUM_DECKS] = [DeckSide::A, DeckSide::B];

    /// The opposite deck
    #[inline]
    pub fn other(self) -> Self {
        match self {
            DeckSide::A => DeckSide::B,
            DeckSide::B => DeckSide::A,
        }
    }

    /// Index (0 for A, 1 for B)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            DeckSide::A => 0,
            DeckSide::B => 1,
        }
    }

    /// Crossfader end stop that selects this deck alone
    #[inline]
    pub fn fader_position(self) -> f32 {
        match self {
            DeckSide::A => -1.0,
            DeckSide::B => 1.0,
        }
    }

    /// Display label ("A" / "B")
    pub fn label(self) -> &'static str {
        match self {
            DeckSide::A => "A",
            DeckSide::B => "B",
        }
    }
}

impl std::fmt::Display for DeckSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deck {}", self.label())
    }
}
