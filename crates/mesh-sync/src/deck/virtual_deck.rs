//! In-memory deck driven by an explicit clock
//!
//! Useful for headless runs and tests: the host advances playback time with
//! [`VirtualDeck::advance`] instead of an audio callback. State lives in
//! atomics so the deck can be read from any thread without locking.
//!
//! All operations use `Ordering::Relaxed`; only visibility is needed.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use super::{Deck, RateAdjustable, Seekable};

/// f64 stored as raw bits
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    #[inline]
    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Deck with a simulated playhead
pub struct VirtualDeck {
    position: AtomicF64,
    duration: AtomicF64,
    bpm: AtomicF64,
    rate: AtomicF64,
    playing: AtomicBool,
    seekable: bool,
    rate_adjustable: bool,
    seek_count: AtomicU32,
}

impl VirtualDeck {
    /// Create a stopped deck at position 0 with both optional capabilities
    pub fn new(duration: f64, bpm: f64) -> Self {
        Self {
            position: AtomicF64::new(0.0),
            duration: AtomicF64::new(duration.max(0.0)),
            bpm: AtomicF64::new(bpm),
            rate: AtomicF64::new(1.0),
            playing: AtomicBool::new(false),
            seekable: true,
            rate_adjustable: true,
            seek_count: AtomicU32::new(0),
        }
    }

    /// Drop the seek capability
    pub fn without_seek(mut self) -> Self {
        self.seekable = false;
        self
    }

    /// Drop the playback-rate capability
    pub fn without_rate_control(mut self) -> Self {
        self.rate_adjustable = false;
        self
    }

    /// Start at `seconds` instead of 0
    pub fn at_position(self, seconds: f64) -> Self {
        self.set_position(seconds);
        self
    }

    /// Start playing immediately
    pub fn playing(self) -> Self {
        self.playing.store(true, Ordering::Relaxed);
        self
    }

    /// Move the playhead (host-side, always available)
    pub fn set_position(&self, seconds: f64) {
        let duration = self.duration.load();
        self.position.store(seconds.clamp(0.0, duration));
    }

    /// Advance wall-clock time by `seconds`
    ///
    /// Playback runs at the current rate; reaching the end stops the deck.
    pub fn advance(&self, seconds: f64) {
        if !self.is_playing() {
            return;
        }
        let duration = self.duration.load();
        let next = self.position.load() + seconds * self.rate.load();
        if next >= duration {
            self.position.store(duration);
            self.playing.store(false, Ordering::Relaxed);
        } else {
            self.position.store(next.max(0.0));
        }
    }

    /// Assign the track tempo (e.g. from metadata or a tempo estimate)
    pub fn set_bpm(&self, bpm: f64) {
        self.bpm.store(bpm);
    }

    /// Current playback rate
    pub fn playback_rate(&self) -> f64 {
        self.rate.load()
    }

    /// Number of seeks issued through the `Seekable` capability
    pub fn seek_count(&self) -> u32 {
        self.seek_count.load(Ordering::Relaxed)
    }
}

impl Seekable for VirtualDeck {
    fn seek(&self, seconds: f64) {
        self.seek_count.fetch_add(1, Ordering::Relaxed);
        self.set_position(seconds);
    }
}

impl RateAdjustable for VirtualDeck {
    fn set_playback_rate(&self, ratio: f64) {
        if ratio.is_finite() && ratio > 0.0 {
            self.rate.store(ratio);
        }
    }
}

impl Deck for VirtualDeck {
    fn current_time(&self) -> f64 {
        self.position.load()
    }

    fn duration(&self) -> f64 {
        self.duration.load()
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    fn bpm(&self) -> f64 {
        self.bpm.load()
    }

    fn play(&self) -> Result<(), String> {
        if self.duration.load() <= 0.0 {
            return Err("no track loaded".to_string());
        }
        self.playing.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn pause(&self) -> Result<(), String> {
        self.playing.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn as_seekable(&self) -> Option<&dyn Seekable> {
        if self.seekable {
            Some(self)
        } else {
            None
        }
    }

    fn as_rate_adjustable(&self) -> Option<&dyn RateAdjustable> {
        if self.rate_adjustable {
            Some(self)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Capability;

    #[test]
    fn test_capabilities() {
        let deck = VirtualDeck::new(180.0, 128.0);
        assert!(deck.supports(Capability::Seek));
        assert!(deck.supports(Capability::PlaybackRate));

        let bare = VirtualDeck::new(180.0, 128.0).without_seek().without_rate_control();
        assert!(!bare.supports(Capability::Seek));
        assert!(!bare.supports(Capability::PlaybackRate));
    }

    #[test]
    fn test_advance_respects_rate_and_end() {
        let deck = VirtualDeck::new(10.0, 120.0).playing();
        deck.set_playback_rate(1.5);
        deck.advance(2.0);
        assert!((deck.current_time() - 3.0).abs() < 1e-12);

        deck.advance(100.0);
        assert_eq!(deck.current_time(), 10.0);
        assert!(!deck.is_playing());
    }

    #[test]
    fn test_paused_deck_does_not_move() {
        let deck = VirtualDeck::new(10.0, 120.0).at_position(4.0);
        deck.advance(1.0);
        assert_eq!(deck.current_time(), 4.0);
    }

    #[test]
    fn test_seek_clamps_and_counts() {
        let deck = VirtualDeck::new(10.0, 120.0);
        deck.seek(-1.0);
        assert_eq!(deck.current_time(), 0.0);
        deck.seek(12.0);
        assert_eq!(deck.current_time(), 10.0);
        assert_eq!(deck.seek_count(), 2);
    }

    #[test]
    fn test_play_without_track_fails() {
        let deck = VirtualDeck::new(0.0, 0.0);
        assert!(deck.play().is_err());
        assert!(!deck.is_playing());
    }
}
