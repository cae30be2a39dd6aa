use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the game currently is in its lifecycle.
///
/// `Menu` is the initial phase. A run moves `Menu -> Playing`, bounces
/// between `Playing` and `LevelTransition` for each knockout, and ends in
/// `GameOver`, from which only `Menu` is reachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for a run to start.
    #[default]
    Menu,
    /// A problem is (or is about to be) on screen.
    Playing,
    /// The opponent was knocked out; the next level is pending.
    LevelTransition,
    /// The player was knocked out.
    GameOver,
}

impl Phase {
    /// Returns true while a run is in progress.
    pub fn in_run(self) -> bool {
        matches!(self, Self::Playing | Self::LevelTransition)
    }

    /// Returns true if the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Self::Menu, Self::Playing)
                | (Self::Playing, Self::LevelTransition)
                | (Self::Playing, Self::GameOver)
                | (Self::LevelTransition, Self::Playing)
                | (Self::GameOver, Self::Menu)
                | (Self::Playing, Self::Menu)
                | (Self::LevelTransition, Self::Menu)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Menu => write!(f, "menu"),
            Self::Playing => write!(f, "playing"),
            Self::LevelTransition => write!(f, "level transition"),
            Self::GameOver => write!(f, "game over"),
        }
    }
}
