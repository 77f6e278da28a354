use thiserror::Error;

use crate::engine::Phase;

/// A rejected action. Every variant leaves the engine state untouched; the
/// caller may retry with a legal action. Variants are machine-matchable so
/// hosts can render their own feedback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{action} is not legal in the {phase:?} phase")]
    WrongPhase {
        action: &'static str,
        phase: Phase,
    },

    #[error("bet must be a positive number of chips")]
    BetTooLow,

    #[error("action needs {need} chips but bankroll is {have}")]
    InsufficientBankroll { need: u64, have: i64 },

    #[error("{0} is only allowed on a two-card hand")]
    NotTwoCards(&'static str),

    #[error("split requires two cards of equal rank")]
    RanksDiffer,

    #[error("this round already used its {0} split(s)")]
    SplitLimitReached(u8),

    #[error("doubling after a split is disabled at this table")]
    DoubleAfterSplitDisabled,
}
