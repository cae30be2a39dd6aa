//! The boundary between the engine and whatever draws it.
//!
//! Calls are fire-and-forget: the engine never waits on a presenter and
//! never reads anything back except through
//! [`BattleEngine::set_animation`](crate::engine::BattleEngine::set_animation).

use crate::event::{BattleEvent, EventLog};
use crate::snapshot::Snapshot;

/// Receives frames and discrete events from a [`crate::engine::BattleEngine`].
pub trait Presenter {
    /// Called after every state mutation with the new frame.
    fn render(&mut self, _snapshot: &Snapshot) {}

    /// Called once for every discrete event, before the following render.
    fn notify(&mut self, _event: &BattleEvent) {}
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn render(&mut self, snapshot: &Snapshot) {
        (**self).render(snapshot);
    }

    fn notify(&mut self, event: &BattleEvent) {
        (**self).notify(event);
    }
}

/// Discards everything. Used for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

/// Keeps every event and the latest frame.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    log: EventLog,
    last: Option<Snapshot>,
    renders: usize,
}

impl RecordingPresenter {
    /// Create a presenter with an unbounded log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a presenter whose log keeps at most `max_events` entries.
    pub fn with_capacity(max_events: usize) -> Self {
        Self {
            log: EventLog::new(max_events),
            ..Self::default()
        }
    }

    /// Recorded events.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// The most recent frame.
    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }

    /// How many frames were rendered.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Forget recorded events and frames.
    pub fn clear(&mut self) {
        self.log.clear();
        self.last = None;
        self.renders = 0;
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, snapshot: &Snapshot) {
        self.last = Some(snapshot.clone());
        self.renders += 1;
    }

    fn notify(&mut self, event: &BattleEvent) {
        self.log.push(event.clone());
    }
}
