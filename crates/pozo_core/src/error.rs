//! Engine errors

use thiserror::Error;

/// Validation failures reported by the engine.
///
/// None of these leave a roster half-updated: every operation builds a new
/// snapshot and only returns it on success.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("not enough participants: {found} eligible, at least {required} required")]
    NotEnoughParticipants { found: usize, required: usize },

    #[error("at least one court is required")]
    NoCourts,

    #[error("round {requested} exceeds the event limit of {limit} rounds")]
    RoundLimitReached { requested: u32, limit: u32 },

    #[error("round {round} still has {pending} unfinished matches")]
    UnfinishedRound { round: u32, pending: usize },

    #[error("participant {id} is not eligible for a {category} event")]
    IneligibleParticipant { id: String, category: String },

    #[error("invalid round number: {0}")]
    InvalidRound(u32),
}

pub type Result<T> = std::result::Result<T, EngineError>;
