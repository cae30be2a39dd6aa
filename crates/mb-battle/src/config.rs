//! Configuration for a battle engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use mb_core::Balance;
use mb_quiz::CommentaryTable;

use crate::error::BattleResult;

/// Everything an engine needs besides its store and presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// RNG seed for reproducible problems and commentary.
    pub seed: u64,
    /// Fight constants.
    pub balance: Balance,
    /// Commentary pools.
    pub commentary: CommentaryTable,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            balance: Balance::default(),
            commentary: CommentaryTable::default(),
        }
    }
}

impl BattleConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> BattleResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.balance.validate()?;
        Ok(config)
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the balance table.
    pub fn with_balance(mut self, balance: Balance) -> Self {
        self.balance = balance;
        self
    }

    /// Replace the commentary table.
    pub fn with_commentary(mut self, commentary: CommentaryTable) -> Self {
        self.commentary = commentary;
        self
    }
}
