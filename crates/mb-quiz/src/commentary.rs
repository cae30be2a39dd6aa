//! Ringside commentary lines.
//!
//! A [`CommentaryTable`] holds one pool of template lines per battle event,
//! plus two "near defeat" pools that replace the generic correct/wrong pools
//! when the losing side is low on health. Selection inside a pool is
//! uniform; nothing prevents the same line from being picked twice in a row.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lines announced when a level starts.
pub const START_LINES: &[&str] = &[
    "Ding ding! Our math champion steps in against the Iron Robot!",
    "The bell rings! Let's see whose brain spins faster!",
    "Ready? Knock it down with your times tables!",
    "Fighters to your corners. The math bout begins!",
];

/// Lines announced when an opponent is knocked out.
pub const WIN_LINES: &[&str] = &[
    "Victory! The smartest boxer in the universe!",
    "The robot is heading home to recharge its batteries!",
    "Fantastic! The golden belt is yours!",
    "A clean sweep! You calculate faster than a rocket!",
];

/// Lines announced when the player is knocked out.
pub const LOSE_LINES: &[&str] = &[
    "So close! The robot got lucky this time. Rematch?",
    "No worries, every champion loses a bout. Win the next one!",
    "Brush up on those tables and come back swinging!",
    "Just a hair short. Next time it's yours!",
];

/// Lines for a correct answer.
pub const CORRECT_LINES: &[&str] = &[
    "Beautiful! The robot is smoking!",
    "What a punch! That one had real power!",
    "Too strong! The robot can't block that!",
    "Calculated to perfection! Right on target!",
    "The robot is dazed. Keep it up!",
    "Perfect answer, perfect punch!",
];

/// Lines for a wrong answer.
pub const WRONG_LINES: &[&str] = &[
    "Whoops! That swing hit nothing but air!",
    "Shake it off, the robot just got lucky!",
    "Steady now. Deep breath, next one lands!",
    "Don't panic, the robot is getting cocky!",
    "A slip! You'll get the next one right!",
    "Read the question carefully and go again!",
];

/// Lines for a correct answer when the opponent is nearly out.
pub const OPPONENT_NEAR_DEFEAT_LINES: &[&str] = &[
    "The robot is falling apart, victory is in sight!",
    "One more push, the robot can barely stand!",
    "Finish it! Show it what you've got!",
];

/// Lines for a wrong answer when the player is nearly out.
pub const PLAYER_NEAR_DEFEAT_LINES: &[&str] = &[
    "Ouch! You're running low, be careful!",
    "Hang in there! Don't give up!",
    "Time for a comeback!",
];

/// Health below which the near-defeat pools are used.
pub const NEAR_DEFEAT_THRESHOLD: u32 = 5;

/// The battle moment a commentary line is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentaryEvent {
    /// A level begins.
    Start,
    /// The player answered correctly.
    Correct,
    /// The player answered wrongly.
    Wrong,
    /// The opponent was knocked out.
    Win,
    /// The player was knocked out.
    Lose,
}

impl fmt::Display for CommentaryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Correct => write!(f, "correct"),
            Self::Wrong => write!(f, "wrong"),
            Self::Win => write!(f, "win"),
            Self::Lose => write!(f, "lose"),
        }
    }
}

/// Commentary pools, one per event plus the two near-defeat pools.
///
/// Custom tables deserialize from JSON; any pool left out keeps the
/// built-in lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryTable {
    /// Lines for [`CommentaryEvent::Start`].
    pub start: Vec<String>,
    /// Lines for [`CommentaryEvent::Win`].
    pub win: Vec<String>,
    /// Lines for [`CommentaryEvent::Lose`].
    pub lose: Vec<String>,
    /// Lines for [`CommentaryEvent::Correct`].
    pub correct: Vec<String>,
    /// Lines for [`CommentaryEvent::Wrong`].
    pub wrong: Vec<String>,
    /// Lines for a correct answer while the opponent is nearly out.
    pub opponent_near_defeat: Vec<String>,
    /// Lines for a wrong answer while the player is nearly out.
    pub player_near_defeat: Vec<String>,
    /// Health below which the near-defeat pools take over.
    pub near_defeat_threshold: u32,
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| (*s).to_string()).collect()
}

impl Default for CommentaryTable {
    fn default() -> Self {
        Self {
            start: owned(START_LINES),
            win: owned(WIN_LINES),
            lose: owned(LOSE_LINES),
            correct: owned(CORRECT_LINES),
            wrong: owned(WRONG_LINES),
            opponent_near_defeat: owned(OPPONENT_NEAR_DEFEAT_LINES),
            player_near_defeat: owned(PLAYER_NEAR_DEFEAT_LINES),
            near_defeat_threshold: NEAR_DEFEAT_THRESHOLD,
        }
    }
}

impl CommentaryTable {
    /// The pool a given event draws from at the given health values.
    pub fn pool(&self, player_hp: u32, opponent_hp: u32, event: CommentaryEvent) -> &[String] {
        match event {
            CommentaryEvent::Correct if opponent_hp < self.near_defeat_threshold => {
                &self.opponent_near_defeat
            }
            CommentaryEvent::Correct => &self.correct,
            CommentaryEvent::Wrong if player_hp < self.near_defeat_threshold => {
                &self.player_near_defeat
            }
            CommentaryEvent::Wrong => &self.wrong,
            CommentaryEvent::Start => &self.start,
            CommentaryEvent::Win => &self.win,
            CommentaryEvent::Lose => &self.lose,
        }
    }

    /// Pick a line for `event`. Returns an empty string if the pool is empty.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        player_hp: u32,
        opponent_hp: u32,
        event: CommentaryEvent,
        rng: &mut R,
    ) -> &str {
        let pool = self.pool(player_hp, opponent_hp, event);
        if pool.is_empty() {
            ""
        } else {
            &pool[rng.random_range(0..pool.len())]
        }
    }
}
