use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// How large the operands of generated problems may get.
///
/// Chosen once when a run starts and fixed until the run ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Times tables up to 5.
    #[default]
    Easy,
    /// Times tables up to 9.
    Hard,
}

impl Difficulty {
    /// Every difficulty, in menu order.
    pub const ALL: [Difficulty; 2] = [Difficulty::Easy, Difficulty::Hard];

    /// Inclusive range both operands are drawn from.
    pub fn operand_range(self) -> RangeInclusive<u32> {
        match self {
            Self::Easy => 1..=5,
            Self::Hard => 1..=9,
        }
    }

    /// Short label for menus.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" => Ok(Self::Easy),
            "hard" | "h" => Ok(Self::Hard),
            _ => Err(CoreError::UnknownDifficulty(s.to_string())),
        }
    }
}
