//! Balance and pacing constants.
//!
//! Every number that shapes a fight lives here rather than being inlined in
//! the engine. The defaults are the canonical set: 1 damage per correct
//! answer, 3 on every third answer of a combo, 2 damage per wrong answer,
//! 5 hp healed per knockout, and opponents growing by 4 hp per level up to
//! 60.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The full set of tunable fight constants.
///
/// Deserializes with per-field defaults, so a JSON file only needs the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    /// Player hp at the start of a run.
    pub player_max_hp: u32,
    /// Damage dealt by a normal correct answer.
    pub hit_damage: u32,
    /// Damage dealt by a critical hit.
    pub critical_damage: u32,
    /// A correct answer is critical when the combo is a multiple of this.
    pub critical_every: u32,
    /// Damage the player takes for a wrong answer.
    pub wrong_penalty: u32,
    /// Hp the player recovers after knocking out an opponent.
    pub level_heal: u32,
    /// Opponent max hp on level 1.
    pub opponent_base_hp: u32,
    /// Opponent max hp added per level.
    pub opponent_hp_step: u32,
    /// Upper bound on opponent max hp.
    pub opponent_hp_cap: u32,
    /// Pause between an answer and the next problem, in milliseconds.
    pub next_problem_delay_ms: u64,
    /// Pause between a knockout and the next level, in milliseconds.
    pub level_transition_delay_ms: u64,
}

impl Default for Balance {
    fn default() -> Self {
        Self {
            player_max_hp: 20,
            hit_damage: 1,
            critical_damage: 3,
            critical_every: 3,
            wrong_penalty: 2,
            level_heal: 5,
            opponent_base_hp: 5,
            opponent_hp_step: 4,
            opponent_hp_cap: 60,
            next_problem_delay_ms: 800,
            level_transition_delay_ms: 2000,
        }
    }
}

impl Balance {
    /// Opponent max hp for a 1-based level: `min(cap, base + (level - 1) * step)`.
    pub fn opponent_max_hp(&self, level: u32) -> u32 {
        let extra = level
            .saturating_sub(1)
            .saturating_mul(self.opponent_hp_step);
        self.opponent_base_hp
            .saturating_add(extra)
            .min(self.opponent_hp_cap)
    }

    /// Returns true if a correct answer landing on `combo` is a critical hit.
    pub fn is_critical(&self, combo: u32) -> bool {
        combo > 0 && combo % self.critical_every == 0
    }

    /// Damage dealt by a correct answer landing on `combo`.
    pub fn damage_for_combo(&self, combo: u32) -> u32 {
        if self.is_critical(combo) {
            self.critical_damage
        } else {
            self.hit_damage
        }
    }

    /// Pause between an answer and the next problem.
    pub fn next_problem_delay(&self) -> Duration {
        Duration::from_millis(self.next_problem_delay_ms)
    }

    /// Pause between a knockout and the next level.
    pub fn level_transition_delay(&self) -> Duration {
        Duration::from_millis(self.level_transition_delay_ms)
    }

    /// Reject tables the engine cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.player_max_hp == 0 {
            return Err(CoreError::InvalidBalance(
                "player_max_hp must be positive".into(),
            ));
        }
        if self.opponent_base_hp == 0 {
            return Err(CoreError::InvalidBalance(
                "opponent_base_hp must be positive".into(),
            ));
        }
        if self.opponent_hp_cap < self.opponent_base_hp {
            return Err(CoreError::InvalidBalance(format!(
                "opponent_hp_cap ({}) is below opponent_base_hp ({})",
                self.opponent_hp_cap, self.opponent_base_hp
            )));
        }
        if self.critical_every == 0 {
            return Err(CoreError::InvalidBalance(
                "critical_every must be positive".into(),
            ));
        }
        if self.hit_damage == 0 || self.wrong_penalty == 0 {
            return Err(CoreError::InvalidBalance(
                "hit_damage and wrong_penalty must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Set the player's starting hp.
    pub fn with_player_max_hp(mut self, hp: u32) -> Self {
        self.player_max_hp = hp;
        self
    }

    /// Set normal and critical damage.
    pub fn with_damage(mut self, hit: u32, critical: u32) -> Self {
        self.hit_damage = hit;
        self.critical_damage = critical;
        self
    }

    /// Set the wrong-answer penalty.
    pub fn with_wrong_penalty(mut self, penalty: u32) -> Self {
        self.wrong_penalty = penalty;
        self
    }

    /// Set the heal granted per knockout.
    pub fn with_level_heal(mut self, heal: u32) -> Self {
        self.level_heal = heal;
        self
    }

    /// Set the opponent hp formula.
    pub fn with_opponent_scaling(mut self, base: u32, step: u32, cap: u32) -> Self {
        self.opponent_base_hp = base;
        self.opponent_hp_step = step;
        self.opponent_hp_cap = cap;
        self
    }

    /// Set both pacing delays in milliseconds.
    pub fn with_delays(mut self, next_problem_ms: u64, level_transition_ms: u64) -> Self {
        self.next_problem_delay_ms = next_problem_ms;
        self.level_transition_delay_ms = level_transition_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let b = Balance::default();
        assert_eq!(b.player_max_hp, 20);
        assert_eq!(b.hit_damage, 1);
        assert_eq!(b.critical_damage, 3);
        assert_eq!(b.wrong_penalty, 2);
        assert_eq!(b.level_heal, 5);
        assert_eq!(b.next_problem_delay(), Duration::from_millis(800));
        assert_eq!(b.level_transition_delay(), Duration::from_secs(2));
        assert!(b.validate().is_ok());
    }

    #[test]
    fn opponent_scaling() {
        let b = Balance::default();
        assert_eq!(b.opponent_max_hp(1), 5);
        assert_eq!(b.opponent_max_hp(2), 9);
        assert_eq!(b.opponent_max_hp(5), 21);
        assert_eq!(b.opponent_max_hp(14), 57);
        assert_eq!(b.opponent_max_hp(15), 60);
        assert_eq!(b.opponent_max_hp(1000), 60);
        assert_eq!(b.opponent_max_hp(u32::MAX), 60);
    }

    #[test]
    fn level_zero_is_treated_as_first() {
        assert_eq!(Balance::default().opponent_max_hp(0), 5);
    }

    #[test]
    fn alternate_scaling() {
        let b = Balance::default().with_opponent_scaling(5, 3, 50);
        assert_eq!(b.opponent_max_hp(2), 8);
        assert_eq!(b.opponent_max_hp(100), 50);
    }

    #[test]
    fn criticals_on_multiples_of_three() {
        let b = Balance::default();
        let crits: Vec<u32> = (0..=9).filter(|&c| b.is_critical(c)).collect();
        assert_eq!(crits, vec![3, 6, 9]);
        assert_eq!(b.damage_for_combo(2), 1);
        assert_eq!(b.damage_for_combo(3), 3);
    }

    #[test]
    fn validate_rejects_bad_tables() {
        assert!(Balance::default().with_player_max_hp(0).validate().is_err());
        assert!(
            Balance::default()
                .with_opponent_scaling(10, 1, 5)
                .validate()
                .is_err()
        );
        let b = Balance {
            critical_every: 0,
            ..Balance::default()
        };
        assert!(b.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let b: Balance = serde_json::from_str(r#"{"wrong_penalty": 1, "level_heal": 3}"#).unwrap();
        assert_eq!(b.wrong_penalty, 1);
        assert_eq!(b.level_heal, 3);
        assert_eq!(b.player_max_hp, 20);
    }

}
