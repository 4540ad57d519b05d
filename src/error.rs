//! Error types for recoverable failures
//!
//! Broken invariants (CPU table index out of range, a lap resolved twice)
//! are programming errors and panic instead.

use thiserror::Error;

/// Errors surfaced to callers of the duel engine
#[derive(Debug, Error)]
pub enum DuelError {
    /// Difficulty name did not match any tier
    #[error("unknown difficulty: {0:?}")]
    UnknownDifficulty(String),
    /// `play_again` was called before any match was started
    #[error("no difficulty chosen yet; start a game first")]
    NoDifficulty,
    /// Tuning values are inconsistent
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
    /// Tuning or settings JSON failed to parse
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}
