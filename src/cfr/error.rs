//! Error types for the solver.
//!
//! Every failure the solver can report is an invariant violation or a
//! programmer error. Nothing here is retryable.

use thiserror::Error;

use crate::cfr::config::ConfigError;

/// Errors raised by the solver and its passes.
#[derive(Debug, Error)]
pub enum SolverError {
    /// An information set was looked up that was never initialized.
    #[error("information set {key} was never initialized")]
    NotFound {
        /// Display form of the missing identifier.
        key: String,
    },

    /// A belief or strategy normalization divided by a zero total.
    #[error("{stage} normalization for {key} has a zero total")]
    Normalization {
        /// Which step failed (`"belief"` or `"strategy"`).
        stage: &'static str,
        /// Display form of the information set being normalized.
        key: String,
    },

    /// A payoff was requested for a history that does not end the game.
    #[error("history {history:?} is not terminal")]
    NotTerminal {
        /// Symbols of the offending history.
        history: String,
    },

    /// The solver loop was driven before `initialize` ran.
    #[error("solver has not been initialized")]
    NotInitialized,

    /// An externally supplied strategy is not a probability distribution
    /// over the action alphabet.
    #[error("invalid strategy for {key}: {reason}")]
    InvalidStrategy {
        /// Display form of the target information set.
        key: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
