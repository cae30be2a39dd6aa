/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while parsing or validating core values.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A difficulty name did not match any known setting.
    #[error("unknown difficulty: \"{0}\" (expected easy or hard)")]
    UnknownDifficulty(String),

    /// A balance table contains values the engine cannot run with.
    #[error("invalid balance: {0}")]
    InvalidBalance(String),
}
