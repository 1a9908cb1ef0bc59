//! Deck capabilities consumed by the matcher and Auto-DJ
//!
//! A deck is an external player. Every deck exposes transport basics
//! through [`Deck`]; seeking and rate control are optional capabilities
//! advertised through `as_seekable` / `as_rate_adjustable`. Components ask
//! for a capability and skip the physical half of a correction when it is
//! missing.
//!
//! All methods take `&self` so one deck can be shared between the matcher,
//! the Auto-DJ task and the UI. Implementations use interior mutability
//! (see [`VirtualDeck`], which keeps its state in atomics).

mod virtual_deck;

pub use virtual_deck::VirtualDeck;

/// Optional deck capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Seek,
    PlaybackRate,
}

/// Jump to an absolute playback position
pub trait Seekable {
    fn seek(&self, seconds: f64);
}

/// Change playback speed (1.0 = original tempo)
pub trait RateAdjustable {
    fn set_playback_rate(&self, ratio: f64);
}

/// Transport and metadata every deck provides
pub trait Deck: Send + Sync {
    /// Current playhead in seconds
    fn current_time(&self) -> f64;

    /// Track length in seconds
    fn duration(&self) -> f64;

    fn is_playing(&self) -> bool;

    /// Native tempo of the loaded track (metadata or tempo estimate), 0 if unknown
    fn bpm(&self) -> f64;

    fn play(&self) -> Result<(), String>;

    fn pause(&self) -> Result<(), String>;

    fn as_seekable(&self) -> Option<&dyn Seekable> {
        None
    }

    fn as_rate_adjustable(&self) -> Option<&dyn RateAdjustable> {
        None
    }

    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Seek => self.as_seekable().is_some(),
            Capability::PlaybackRate => self.as_rate_adjustable().is_some(),
        }
    }
}
