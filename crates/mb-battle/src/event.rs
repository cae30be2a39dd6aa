use serde::{Deserialize, Serialize};

use mb_core::{Difficulty, ProblemId};
use mb_quiz::CommentaryEvent;

/// What happened during a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEventKind {
    // Run lifecycle
    /// A run left the menu.
    RunStarted {
        /// Difficulty fixed for the run.
        difficulty: Difficulty,
    },
    /// A fresh opponent entered the ring.
    LevelStarted {
        /// The level number, starting at 1.
        level: u32,
        /// The opponent's full health.
        opponent_max_hp: u32,
    },
    /// The player was knocked out.
    RunLost {
        /// Level reached.
        level: u32,
        /// Whether this run set a new best level.
        new_best: bool,
    },
    /// The run was closed and the engine is back in the menu.
    ReturnedToMenu,

    // Turns
    /// A new problem is on screen.
    ProblemPosed {
        /// The problem's id.
        problem: ProblemId,
        /// Question text, e.g. `6 × 7 = ?`.
        question: String,
    },
    /// The player answered correctly and landed a punch.
    ProblemCorrect {
        /// Whether the punch was a critical hit.
        critical: bool,
        /// Damage dealt to the opponent.
        damage: u32,
        /// Combo after this answer.
        combo: u32,
    },
    /// The player answered wrongly and took a punch.
    ProblemWrong {
        /// Damage taken.
        penalty: u32,
        /// The answer that would have been correct.
        answer: u32,
    },
    /// The opponent was knocked out.
    LevelWon {
        /// Level just cleared.
        level: u32,
        /// Health restored to the player.
        heal: u32,
    },

    // Flavor
    /// A ringside commentary line.
    Commentary {
        /// Which moment the line was picked for.
        event: CommentaryEvent,
        /// The line itself.
        text: String,
    },
}

/// A timestamped battle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEvent {
    /// Virtual time in milliseconds when the event occurred.
    pub at_ms: u64,
    /// What happened.
    pub kind: BattleEventKind,
}

impl BattleEvent {
    /// Create an event at the given virtual time.
    pub fn new(at_ms: u64, kind: BattleEventKind) -> Self {
        Self { at_ms, kind }
    }
}

/// Accumulates events for inspection, optionally bounded.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<BattleEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a log holding at most `max_events` entries (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest ones past capacity.
    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
