use serde::{Deserialize, Serialize};

use mb_core::{AnimationFlags, Combatant, Difficulty, Phase, Problem};

use crate::run::{Feedback, Run, RunStats};

/// Read-only view of one combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthView {
    /// Current hp.
    pub hp: u32,
    /// Maximum hp.
    pub max_hp: u32,
    /// Animation flags last written by presentation.
    pub animation: AnimationFlags,
}

impl From<&Combatant> for HealthView {
    fn from(c: &Combatant) -> Self {
        Self {
            hp: c.hp(),
            max_hp: c.max_hp(),
            animation: c.animation,
        }
    }
}

/// Everything a renderer needs to draw the current frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current phase.
    pub phase: Phase,
    /// Difficulty of the current (or last) run.
    pub difficulty: Difficulty,
    /// Current level.
    pub level: u32,
    /// Current combo.
    pub combo: u32,
    /// The player's health.
    pub player: HealthView,
    /// The opponent's health.
    pub opponent: HealthView,
    /// The problem on screen.
    pub current_problem: Option<Problem>,
    /// Feedback for the last answer.
    pub feedback: Option<Feedback>,
    /// The correct answer after a wrong one.
    pub revealed_answer: Option<u32>,
    /// Latest commentary line.
    pub commentary: Option<String>,
    /// Best level across runs.
    pub best_level: u32,
    /// Run counters.
    pub stats: RunStats,
    /// An answer is being resolved and further input is ignored.
    pub in_flight: bool,
}

impl Snapshot {
    pub(crate) fn capture(phase: Phase, run: &Run, best_level: u32) -> Self {
        Self {
            phase,
            difficulty: run.difficulty(),
            level: run.level(),
            combo: run.combo(),
            player: HealthView::from(run.player()),
            opponent: HealthView::from(run.opponent()),
            current_problem: run.problem().cloned(),
            feedback: run.feedback(),
            revealed_answer: run.revealed_answer(),
            commentary: run.commentary().map(str::to_string),
            best_level,
            stats: *run.stats(),
            in_flight: run.in_flight(),
        }
    }

    /// Returns `true` when answer buttons should accept input.
    pub fn accepts_answers(&self) -> bool {
        self.phase == Phase::Playing && self.current_problem.is_some() && !self.in_flight
    }
}
