//! Core types for Math Boxing.
//!
//! This crate defines the values the battle engine works with: arithmetic
//! problems, the two combatants and their health pools, the game phase, and
//! the [`Balance`] table holding every tunable constant. It has no notion of
//! time or randomness; those live in `mb-quiz` and `mb-battle`.

/// Tunable balance and pacing constants.
pub mod balance;
/// Health pools for the player and the opponent.
pub mod combatant;
/// Difficulty settings chosen at the start of a run.
pub mod difficulty;
/// Error types used throughout the crate.
pub mod error;
/// The game phase state machine labels.
pub mod phase;
/// Arithmetic problems and their answer options.
pub mod problem;

/// Re-export balance types.
pub use balance::Balance;
/// Re-export combatant types.
pub use combatant::{AnimationFlags, Combatant, Side};
/// Re-export difficulty.
pub use difficulty::Difficulty;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export phase.
pub use phase::Phase;
/// Re-export problem types.
pub use problem::{OPTION_COUNT, Operation, Problem, ProblemId};
