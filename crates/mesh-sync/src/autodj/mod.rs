//! Auto-DJ - hands-free transitions between the two decks
//!
//! While active, a tokio task checks the live deck once per poll interval.
//! When it has `trigger_beats` or fewer beats left and the other deck is
//! idle, a transition runs:
//!
//! 1. Beat matcher `auto_sync` (a failure is logged and the blend proceeds)
//! 2. Incoming deck starts playing
//! 3. Crossfader ramps across `ramp_steps` steps over `transition_beats`
//!    beats of the outgoing track
//! 4. Outgoing deck pauses and the incoming deck becomes live
//!
//! Every transition carries its own cancellation flag, checked before each
//! ramp step. `stop()` sets it: the ramp halts where it is, both decks keep
//! playing and the live deck does not change. Once the live deck stops with
//! the other deck still playing, the next poll makes the other deck live and
//! moves the fader to its end stop.
//!
//! Matcher and crossfader are shared with the UI through `Arc<Mutex<_>>`.
//! Locks are only held for a single call, never across a suspension point,
//! so a manual fader move during a ramp is simply overwritten by the next
//! step.

mod plan;

pub use plan::{beats_remaining, TransitionPlan};

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam::channel::{Receiver, Sender};
use tokio::task::JoinHandle;

use crate::config::AutoDjConfig;
use crate::crossfader::Crossfader;
use crate::deck::Deck;
use crate::error::{SyncError, SyncResult};
use crate::matcher::BeatMatcher;
use crate::types::DeckSide;

/// Auto-DJ run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoDjState {
    Idle,
    Active,
}

/// How a transition ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Completed,
    Cancelled,
}

/// Notifications for subscribers (UI, logging)
#[derive(Debug, Clone, PartialEq)]
pub enum AutoDjEvent {
    Started,
    Stopped,
    TransitionStarted { from: DeckSide, to: DeckSide },
    /// Beat sync failed; the crossfade still runs
    SyncFailed { error: SyncError },
    TransitionCompleted { live: DeckSide },
    /// Ramp halted at `position`
    TransitionCancelled { position: f32 },
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Automatic transition orchestrator
///
/// Dropping the handle stops the polling task.
pub struct AutoDj {
    shared: Arc<Shared>,
}

struct Shared {
    deck_a: Arc<dyn Deck>,
    deck_b: Arc<dyn Deck>,
    matcher: Arc<Mutex<BeatMatcher>>,
    crossfader: Arc<Mutex<Crossfader>>,
    config: Mutex<AutoDjConfig>,
    active: AtomicBool,
    /// Bumped on every start so a stale polling task exits
    generation: AtomicU64,
    live_is_b: AtomicBool,
    transitioning: AtomicBool,
    cancel: Mutex<Option<Arc<AtomicBool>>>,
    subscribers: Mutex<Vec<Sender<AutoDjEvent>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AutoDj {
    /// Create an idle Auto-DJ with deck A live
    pub fn new(
        deck_a: Arc<dyn Deck>,
        deck_b: Arc<dyn Deck>,
        matcher: Arc<Mutex<BeatMatcher>>,
        crossfader: Arc<Mutex<Crossfader>>,
        config: AutoDjConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                deck_a,
                deck_b,
                matcher,
                crossfader,
                config: Mutex::new(config),
                active: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                live_is_b: AtomicBool::new(false),
                transitioning: AtomicBool::new(false),
                cancel: Mutex::new(None),
                subscribers: Mutex::new(Vec::new()),
                task: Mutex::new(None),
            }),
        }
    }

    /// Start polling on the current tokio runtime
    ///
    /// Calling `start` while already active does nothing.
    pub fn start(&self) -> SyncResult<()> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            log::warn!("AutoDj: start() called outside a tokio runtime");
            SyncError::NoRuntime
        })?;

        if self.shared.active.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;

        log::info!("AutoDj: started (live {})", self.shared.live_deck());
        self.shared.emit(AutoDjEvent::Started);

        let shared = Arc::clone(&self.shared);
        let task = runtime.spawn(async move { shared.monitor(generation).await });
        *lock(&self.shared.task) = Some(task);
        Ok(())
    }

    /// Stop polling and cancel a running ramp before its next step
    pub fn stop(&self) {
        let was_active = self.shared.active.swap(false, Ordering::SeqCst);
        self.shared.cancel_transition();
        if was_active {
            log::info!("AutoDj: stopped");
            self.shared.emit(AutoDjEvent::Stopped);
        }
        // The task exits at its next check; dropping the handle detaches it
        lock(&self.shared.task).take();
    }

    pub fn state(&self) -> AutoDjState {
        if self.shared.active.load(Ordering::SeqCst) {
            AutoDjState::Active
        } else {
            AutoDjState::Idle
        }
    }

    /// Deck currently feeding the mix
    pub fn live_deck(&self) -> DeckSide {
        self.shared.live_deck()
    }

    pub fn is_transitioning(&self) -> bool {
        self.shared.transitioning.load(Ordering::SeqCst)
    }

    /// Transition length in beats of the outgoing track (at least 1)
    pub fn set_transition_duration(&self, beats: u32) -> SyncResult<()> {
        if beats == 0 {
            return Err(SyncError::InvalidTransitionDuration(beats));
        }
        lock(&self.shared.config).transition_beats = beats;
        Ok(())
    }

    pub fn transition_duration(&self) -> u32 {
        lock(&self.shared.config).transition_beats
    }

    /// Receive future events
    pub fn subscribe(&self) -> Receiver<AutoDjEvent> {
        let (tx, rx) = crossbeam::channel::unbounded();
        lock(&self.shared.subscribers).push(tx);
        rx
    }

    /// Run one playback check; returns the transition outcome if one ran
    ///
    /// Runs whether or not the polling task is active. If the live deck has
    /// stopped while the other deck plays (a cancelled ramp), the other deck
    /// is made live and the fader moves to its end stop.
    pub async fn poll_once(&self) -> Option<SyncResult<TransitionOutcome>> {
        self.shared.poll(None).await
    }

    /// Transition from the live deck to the other one right now
    pub async fn transition(&self) -> SyncResult<TransitionOutcome> {
        self.shared.transition(None).await
    }
}

impl Drop for AutoDj {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    fn live_deck(&self) -> DeckSide {
        if self.live_is_b.load(Ordering::SeqCst) {
            DeckSide::B
        } else {
            DeckSide::A
        }
    }

    fn deck(&self, side: DeckSide) -> &Arc<dyn Deck> {
        match side {
            DeckSide::A => &self.deck_a,
            DeckSide::B => &self.deck_b,
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.active.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }

    fn emit(&self, event: AutoDjEvent) {
        lock(&self.subscribers).retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn cancel_transition(&self) {
        if let Some(flag) = lock(&self.cancel).as_ref() {
            flag.store(true, Ordering::SeqCst);
        }
    }

    async fn monitor(self: Arc<Self>, generation: u64) {
        log::debug!("AutoDj: monitor task {} running", generation);
        while self.is_current(generation) {
            if let Some(Err(e)) = self.poll(Some(generation)).await {
                log::warn!("AutoDj: transition failed: {}", e);
            }

            let interval = lock(&self.config).poll_interval();
            tokio::time::sleep(interval).await;
        }
        log::debug!("AutoDj: monitor task {} exiting", generation);
    }

    /// One playback check
    ///
    /// `generation` is set when called from the polling task; a transition
    /// is then only started while that task is still the current one.
    async fn poll(&self, generation: Option<u64>) -> Option<SyncResult<TransitionOutcome>> {
        if self.transitioning.load(Ordering::SeqCst) {
            return None;
        }

        let live = self.live_deck();
        let outgoing = self.deck(live);
        let incoming = self.deck(live.other());

        // Left over from a cancelled ramp: only the other deck is still audible
        if !outgoing.is_playing() && incoming.is_playing() {
            return Some(Ok(self.finish_handover(live)));
        }

        let bpm = outgoing.bpm();
        if !bpm.is_finite() || bpm <= 0.0 {
            log::debug!("AutoDj: {} has no tempo, skipping check", live);
            return None;
        }

        let remaining = beats_remaining(outgoing.duration(), outgoing.current_time(), bpm);
        let trigger = lock(&self.config).trigger_beats;
        if remaining <= trigger && !incoming.is_playing() {
            log::info!("AutoDj: {:.1} beats left on {}, starting transition", remaining, live);
            return Some(self.transition(generation).await);
        }
        None
    }

    /// Hand the mix to the other deck without a ramp
    fn finish_handover(&self, from: DeckSide) -> TransitionOutcome {
        let to = from.other();
        lock(&self.crossfader).set_position(to.fader_position());
        self.live_is_b.store(to == DeckSide::B, Ordering::SeqCst);

        log::info!("AutoDj: {} stopped with {} playing, {} is live", from, to, to);
        self.emit(AutoDjEvent::TransitionCompleted { live: to });
        TransitionOutcome::Completed
    }

    /// Claim the transition slot and install its cancellation flag
    ///
    /// Both happen under the `cancel` lock so a concurrent `stop()` either
    /// sees the new flag or has already cleared `active`.
    fn begin_transition(&self) -> SyncResult<Arc<AtomicBool>> {
        let mut slot = lock(&self.cancel);
        if self.transitioning.swap(true, Ordering::SeqCst) {
            return Err(SyncError::TransitionInProgress);
        }
        let cancel = Arc::new(AtomicBool::new(false));
        *slot = Some(Arc::clone(&cancel));
        Ok(cancel)
    }

    async fn transition(&self, generation: Option<u64>) -> SyncResult<TransitionOutcome> {
        let cancel = self.begin_transition()?;
        if generation.is_some_and(|g| !self.is_current(g)) {
            cancel.store(true, Ordering::SeqCst);
        }

        let result = self.run_transition(&cancel).await;

        *lock(&self.cancel) = None;
        self.transitioning.store(false, Ordering::SeqCst);
        result
    }

    async fn run_transition(&self, cancel: &AtomicBool) -> SyncResult<TransitionOutcome> {
        let from = self.live_deck();
        let to = from.other();
        let outgoing = Arc::clone(self.deck(from));
        let incoming = Arc::clone(self.deck(to));

        if cancel.load(Ordering::SeqCst) {
            log::debug!("AutoDj: stopped before transition to {} began", to);
            return Ok(TransitionOutcome::Cancelled);
        }
        self.emit(AutoDjEvent::TransitionStarted { from, to });

        let synced = lock(&self.matcher).auto_sync(self.deck_a.current_time(), self.deck_b.current_time());
        if let Err(error) = synced {
            log::warn!("AutoDj: beat sync failed ({}), crossfading unsynced", error);
            self.emit(AutoDjEvent::SyncFailed { error });
        }

        incoming.play().map_err(|message| {
            log::error!("AutoDj: {} failed to start: {}", to, message);
            SyncError::Deck { deck: to, message }
        })?;

        let plan = {
            let config = lock(&self.config);
            TransitionPlan::new(from, config.transition_beats, outgoing.bpm(), config.ramp_steps)
        };
        log::info!(
            "AutoDj: crossfading {} -> {} over {:?} ({} steps)",
            from,
            to,
            plan.total_duration(),
            plan.total_steps
        );

        for step in 0..=plan.total_steps {
            if cancel.load(Ordering::SeqCst) {
                let position = lock(&self.crossfader).position();
                log::info!("AutoDj: transition cancelled at step {} (fader {:.2})", step, position);
                self.emit(AutoDjEvent::TransitionCancelled { position });
                return Ok(TransitionOutcome::Cancelled);
            }

            lock(&self.crossfader).set_position(plan.position_at(step));

            if step < plan.total_steps {
                tokio::time::sleep(plan.step_duration).await;
            }
        }

        if let Err(message) = outgoing.pause() {
            log::warn!("AutoDj: {} failed to pause: {}", from, message);
        }
        self.live_is_b.store(to == DeckSide::B, Ordering::SeqCst);

        log::info!("AutoDj: transition complete, {} is live", to);
        self.emit(AutoDjEvent::TransitionCompleted { live: to });
        Ok(TransitionOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossfader::AtomicGain;
    use crate::deck::VirtualDeck;
    use crate::matcher::SyncState;
    use std::time::Duration;

    struct Rig {
        deck_a: Arc<VirtualDeck>,
        deck_b: Arc<VirtualDeck>,
        matcher: Arc<Mutex<BeatMatcher>>,
        crossfader: Arc<Mutex<Crossfader>>,
        gain_b: Arc<AtomicGain>,
        auto_dj: AutoDj,
    }

    fn rig(deck_a: VirtualDeck, deck_b: VirtualDeck) -> Rig {
        let deck_a = Arc::new(deck_a);
        let deck_b = Arc::new(deck_b);
        let mut matcher = BeatMatcher::new(deck_a.clone(), deck_b.clone());
        matcher
            .init_beat_grids(deck_a.bpm(), deck_b.bpm(), 0.0, 0.0)
            .unwrap();
        let matcher = Arc::new(Mutex::new(matcher));

        let gain_a = Arc::new(AtomicGain::default());
        let gain_b = Arc::new(AtomicGain::default());
        let mut fader = Crossfader::new(gain_a, gain_b.clone());
        fader.to_a();
        let crossfader = Arc::new(Mutex::new(fader));

        let auto_dj = AutoDj::new(
            deck_a.clone(),
            deck_b.clone(),
            matcher.clone(),
            crossfader.clone(),
            AutoDjConfig::default(),
        );
        Rig {
            deck_a,
            deck_b,
            matcher,
            crossfader,
            gain_b,
            auto_dj,
        }
    }

    fn near_end_rig() -> Rig {
        rig(
            VirtualDeck::new(200.0, 130.0).at_position(185.3).playing(),
            VirtualDeck::new(240.0, 126.0),
        )
    }

    fn fader_position(rig: &Rig) -> f32 {
        rig.crossfader.lock().unwrap().position()
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_triggers_transition_near_end() {
        let rig = near_end_rig();
        let outcome = rig.auto_dj.poll_once().await;

        assert_eq!(outcome, Some(Ok(TransitionOutcome::Completed)));
        assert_eq!(rig.auto_dj.live_deck(), DeckSide::B);
        assert!(!rig.deck_a.is_playing());
        assert!(rig.deck_b.is_playing());
        assert_eq!(fader_position(&rig), 1.0);
        assert_eq!(rig.gain_b.gain(), 1.0);

        let matcher = rig.matcher.lock().unwrap();
        assert_eq!(matcher.state(), SyncState::PhaseAligned);
        assert_eq!(matcher.grid(DeckSide::B).unwrap().bpm(), 130.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_waits_while_plenty_left() {
        let rig = rig(
            VirtualDeck::new(200.0, 130.0).at_position(180.0).playing(),
            VirtualDeck::new(240.0, 126.0),
        );
        // (200 - 180) / 60 × 130 = 43.3 beats
        assert_eq!(rig.auto_dj.poll_once().await, None);
        assert_eq!(rig.auto_dj.live_deck(), DeckSide::A);
        assert!(!rig.deck_b.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_skips_when_incoming_already_playing() {
        let rig = rig(
            VirtualDeck::new(200.0, 130.0).at_position(190.0).playing(),
            VirtualDeck::new(240.0, 126.0).playing(),
        );
        assert_eq!(rig.auto_dj.poll_once().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transition_takes_sixteen_beats() {
        let rig = near_end_rig();
        let started = tokio::time::Instant::now();
        rig.auto_dj.transition().await.unwrap();

        // 16 beats at 130 BPM; the timer wheel rounds each step up to 1 ms
        let expected = Duration::from_secs_f64(16.0 * 60.0 / 130.0);
        let elapsed = started.elapsed();
        assert!(elapsed >= expected - Duration::from_millis(1), "{:?}", elapsed);
        assert!(elapsed <= expected + Duration::from_millis(110), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_ramp() {
        let rig = rig(
            VirtualDeck::new(200.0, 120.0).at_position(190.0).playing(),
            VirtualDeck::new(240.0, 120.0),
        );
        let events = rig.auto_dj.subscribe();

        // 8 s ramp; stop after 2 s
        let stopper = async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            rig.auto_dj.stop();
        };
        let (outcome, _) = tokio::join!(rig.auto_dj.transition(), stopper);

        assert_eq!(outcome, Ok(TransitionOutcome::Cancelled));
        let position = fader_position(&rig);
        assert!(position > -1.0 && position < 0.0, "position {}", position);
        assert_eq!(rig.auto_dj.live_deck(), DeckSide::A);
        assert!(rig.deck_a.is_playing());
        assert!(rig.deck_b.is_playing());
        assert!(!rig.auto_dj.is_transitioning());

        let events: Vec<_> = events.try_iter().collect();
        assert_eq!(
            events.first(),
            Some(&AutoDjEvent::TransitionStarted { from: DeckSide::A, to: DeckSide::B })
        );
        assert!(matches!(events.last(), Some(AutoDjEvent::TransitionCancelled { .. })));

        // The ramp stays put after cancellation
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fader_position(&rig), position);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_transition_rejected() {
        let rig = near_end_rig();
        let second = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            rig.auto_dj.transition().await
        };
        let (first, second) = tokio::join!(rig.auto_dj.transition(), second);
        assert_eq!(first, Ok(TransitionOutcome::Completed));
        assert_eq!(second, Err(SyncError::TransitionInProgress));
    }

    #[tokio::test(start_paused = true)]
    async fn test_started_task_runs_transition_and_stop_halts_polling() {
        let rig = rig(
            VirtualDeck::new(200.0, 120.0).at_position(100.0).playing(),
            VirtualDeck::new(240.0, 120.0).at_position(0.0),
        );
        rig.auto_dj.start().unwrap();
        assert_eq!(rig.auto_dj.state(), AutoDjState::Active);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(rig.auto_dj.live_deck(), DeckSide::A);

        // 12 s left at 120 BPM = 24 beats -> next poll transitions (8 s ramp)
        rig.deck_a.set_position(188.0);
        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(rig.auto_dj.live_deck(), DeckSide::B);
        assert!(!rig.deck_a.is_playing());

        rig.auto_dj.stop();
        assert_eq!(rig.auto_dj.state(), AutoDjState::Idle);

        // Deck B near its end with A idle would transition if polling continued
        rig.deck_b.set_position(235.0);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(rig.auto_dj.live_deck(), DeckSide::B);
        assert!(!rig.deck_a.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_failure_still_blends() {
        let rig = near_end_rig();
        rig.matcher.lock().unwrap().clear_grid(DeckSide::B);
        let events = rig.auto_dj.subscribe();

        assert_eq!(rig.auto_dj.transition().await, Ok(TransitionOutcome::Completed));
        assert_eq!(fader_position(&rig), 1.0);
        assert!(events
            .try_iter()
            .any(|e| e == AutoDjEvent::SyncFailed { error: SyncError::GridsNotInitialized }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_incoming_play_failure_aborts() {
        let rig = rig(
            VirtualDeck::new(200.0, 130.0).at_position(190.0).playing(),
            VirtualDeck::new(0.0, 126.0),
        );
        let result = rig.auto_dj.transition().await;
        assert!(matches!(result, Err(SyncError::Deck { deck: DeckSide::B, .. })));
        assert_eq!(rig.auto_dj.live_deck(), DeckSide::A);
        assert_eq!(fader_position(&rig), -1.0);
        assert!(!rig.auto_dj.is_transitioning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_cancel_completes_handover() {
        let rig = rig(
            VirtualDeck::new(200.0, 120.0).at_position(190.0).playing(),
            VirtualDeck::new(240.0, 120.0),
        );
        rig.auto_dj.start().unwrap();

        // 20 beats left: the first poll starts an 8 s ramp
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rig.auto_dj.is_transitioning());
        rig.auto_dj.stop();
        rig.auto_dj.start().unwrap();

        // Outgoing track runs out while the incoming deck keeps playing
        rig.deck_a.set_position(200.0);
        rig.deck_a.pause().unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(rig.auto_dj.state(), AutoDjState::Active);
        assert_eq!(rig.auto_dj.live_deck(), DeckSide::B);
        assert_eq!(fader_position(&rig), 1.0);
        assert_eq!(rig.gain_b.gain(), 1.0);
        assert!(rig.deck_b.is_playing());
        assert!(!rig.auto_dj.is_transitioning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_adopts_playing_deck_when_live_stopped() {
        let rig = rig(
            VirtualDeck::new(200.0, 120.0).at_position(200.0),
            VirtualDeck::new(240.0, 120.0).at_position(30.0).playing(),
        );
        let events = rig.auto_dj.subscribe();

        assert_eq!(rig.auto_dj.poll_once().await, Some(Ok(TransitionOutcome::Completed)));
        assert_eq!(rig.auto_dj.live_deck(), DeckSide::B);
        assert_eq!(fader_position(&rig), 1.0);
        assert_eq!(
            events.try_iter().collect::<Vec<_>>(),
            vec![AutoDjEvent::TransitionCompleted { live: DeckSide::B }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_poll_task_does_not_start_ramp() {
        let rig = near_end_rig();
        let events = rig.auto_dj.subscribe();

        // Generation 7 was never started, so the task counts as stopped
        let outcome = rig.auto_dj.shared.transition(Some(7)).await;

        assert_eq!(outcome, Ok(TransitionOutcome::Cancelled));
        assert!(!rig.deck_b.is_playing());
        assert_eq!(fader_position(&rig), -1.0);
        assert_eq!(rig.auto_dj.live_deck(), DeckSide::A);
        assert!(!rig.auto_dj.is_transitioning());
        assert!(events.try_iter().next().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_ramp_from_task_leaves_nothing_running() {
        let rig = near_end_rig();
        rig.auto_dj.start().unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rig.auto_dj.is_transitioning());

        rig.auto_dj.stop();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!rig.auto_dj.is_transitioning());
        let position = fader_position(&rig);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(fader_position(&rig), position);
        assert_eq!(rig.auto_dj.live_deck(), DeckSide::A);
    }

    #[test]
    fn test_start_requires_runtime() {
        let rig = near_end_rig();
        assert_eq!(rig.auto_dj.start(), Err(SyncError::NoRuntime));
        assert_eq!(rig.auto_dj.state(), AutoDjState::Idle);
    }

    #[test]
    fn test_transition_duration() {
        let rig = near_end_rig();
        assert_eq!(rig.auto_dj.transition_duration(), 16);
        rig.auto_dj.set_transition_duration(32).unwrap();
        assert_eq!(rig.auto_dj.transition_duration(), 32);
        assert_eq!(
            rig.auto_dj.set_transition_duration(0),
            Err(SyncError::InvalidTransitionDuration(0))
        );
    }
}
