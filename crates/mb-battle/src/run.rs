//! State of one run, from leaving the menu until game over.

use std::fmt;

use serde::{Deserialize, Serialize};

use mb_core::{Balance, Combatant, Difficulty, Problem};

/// Feedback label shown after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    /// A regular correct answer.
    Nice,
    /// A correct answer on a critical combo.
    Critical,
    /// A wrong answer.
    Ouch,
}

impl Feedback {
    /// Text shown on screen.
    pub fn label(self) -> &'static str {
        match self {
            Self::Nice => "Nice!",
            Self::Critical => "CRITICAL!!",
            Self::Ouch => "Ouch!",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counters shown on the game-over screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Longest combo reached.
    pub max_combo: u32,
    /// Correct answers given.
    pub total_correct: u32,
    /// Wrong answers given.
    pub total_wrong: u32,
    /// Critical hits landed.
    pub critical_hits: u32,
    /// Opponents knocked out.
    pub levels_cleared: u32,
}

impl RunStats {
    /// Share of answers that were correct, or `None` before the first answer.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total_correct + self.total_wrong;
        (total > 0).then(|| f64::from(self.total_correct) / f64::from(total))
    }
}

/// Mutable state of the current run. Owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub(crate) difficulty: Difficulty,
    pub(crate) level: u32,
    pub(crate) combo: u32,
    pub(crate) player: Combatant,
    pub(crate) opponent: Combatant,
    pub(crate) problem: Option<Problem>,
    pub(crate) feedback: Option<Feedback>,
    pub(crate) revealed_answer: Option<u32>,
    pub(crate) commentary: Option<String>,
    pub(crate) in_flight: bool,
    pub(crate) stats: RunStats,
}

impl Run {
    /// A fresh run at level 1 with both combatants at full health.
    pub fn new(difficulty: Difficulty, balance: &Balance) -> Self {
        Self {
            difficulty,
            level: 1,
            combo: 0,
            player: Combatant::new(balance.player_max_hp),
            opponent: Combatant::new(balance.opponent_max_hp(1)),
            problem: None,
            feedback: None,
            revealed_answer: None,
            commentary: None,
            in_flight: false,
            stats: RunStats::default(),
        }
    }

    /// Difficulty chosen at the start of the run.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Current level, starting at 1.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Consecutive correct answers since the last wrong one.
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// The player's health pool.
    pub fn player(&self) -> &Combatant {
        &self.player
    }

    /// The current opponent's health pool.
    pub fn opponent(&self) -> &Combatant {
        &self.opponent
    }

    /// The problem on screen, if any.
    pub fn problem(&self) -> Option<&Problem> {
        self.problem.as_ref()
    }

    /// Feedback for the last answer.
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// The correct answer, shown after a wrong one.
    pub fn revealed_answer(&self) -> Option<u32> {
        self.revealed_answer
    }

    /// Latest commentary line.
    pub fn commentary(&self) -> Option<&str> {
        self.commentary.as_deref()
    }

    /// Whether an answer was accepted and its follow-up has not fired yet.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Run counters.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub(crate) fn record_correct(&mut self, critical: bool) -> u32 {
        self.combo += 1;
        self.stats.total_correct += 1;
        self.stats.max_combo = self.stats.max_combo.max(self.combo);
        if critical {
            self.stats.critical_hits += 1;
        }
        self.combo
    }

    pub(crate) fn record_wrong(&mut self) {
        self.combo = 0;
        self.stats.total_wrong += 1;
    }

    pub(crate) fn clear_turn(&mut self) {
        self.feedback = None;
        self.revealed_answer = None;
        self.in_flight = false;
    }
}
