//! Health pools for the two boxers.
//!
//! A combatant's hp is clamped to `0..=max_hp` by every mutating call, so the
//! invariant holds no matter which damage or heal values the balance table
//! feeds in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which corner of the ring a combatant stands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The human answering questions.
    Player,
    /// The level's opponent.
    Opponent,
}

/// Transient animation state owned by presentation.
///
/// The engine stores these flags so renderers can share them, but never
/// reads them when deciding anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationFlags {
    /// The combatant is flinching from a punch.
    pub is_hit: bool,
    /// The combatant is throwing a punch.
    pub is_attacking: bool,
}

/// A boxer's health pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    hp: u32,
    max_hp: u32,
    /// Presentation-only animation flags.
    pub animation: AnimationFlags,
}

impl Combatant {
    /// Create a combatant at full health. A `max_hp` of zero is raised to one.
    pub fn new(max_hp: u32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            hp: max_hp,
            max_hp,
            animation: AnimationFlags::default(),
        }
    }

    /// Current hp.
    pub fn hp(&self) -> u32 {
        self.hp
    }

    /// Maximum hp.
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Subtract `amount`, stopping at zero. Returns the new hp.
    pub fn damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }

    /// Add `amount`, stopping at `max_hp`. Returns the new hp.
    pub fn heal(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp
    }

    /// Refill to `max_hp`.
    pub fn restore(&mut self) {
        self.hp = self.max_hp;
    }

    /// Returns true once hp has reached zero.
    pub fn is_knocked_out(&self) -> bool {
        self.hp == 0
    }

    /// Fraction of health remaining (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        f64::from(self.hp) / f64::from(self.max_hp)
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.hp, self.max_hp)
    }
}
