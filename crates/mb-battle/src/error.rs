//! Error types for the battle engine.

use thiserror::Error;

use mb_core::CoreError;

/// Result type for engine setup and configuration.
pub type BattleResult<T> = Result<T, BattleError>;

/// Result type for best-level storage.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while configuring or constructing an engine.
///
/// Gameplay itself never fails: out-of-order commands are ignored and all
/// health arithmetic is clamped.
#[derive(Debug, Error)]
pub enum BattleError {
    /// The balance table was rejected.
    #[error("{0}")]
    Core(#[from] CoreError),

    /// A configuration file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid JSON.
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a [`crate::store::BestLevelStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the slot failed.
    #[error("best level storage: {0}")]
    Io(#[from] std::io::Error),

    /// The slot does not hold a plain integer.
    #[error("best level storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// No per-user data directory could be determined.
    #[error("no data directory available for best level storage")]
    NoDataDir,
}
