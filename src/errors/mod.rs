use thiserror::Error;

use crate::domain::{MatchId, PlayerId};

/// Domain failures raised by the services.
///
/// These travel inside `anyhow::Error` and are recovered with `downcast_ref`
/// where the caller needs to tell them apart (e.g. to pick an HTTP status).
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Player {player} already has a performance for match {match_id}")]
    DuplicatePerformance { player: PlayerId, match_id: MatchId },

    #[error("Inconsistent state: {0}")]
    InconsistentState(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl StatsError {
    pub fn not_found(entity: &'static str, id: impl Into<i64>) -> Self {
        StatsError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Finds the domain error in an `anyhow` chain, if there is one.
pub fn find_stats_error(error: &anyhow::Error) -> Option<&StatsError> {
    error.chain().find_map(|cause| cause.downcast_ref::<StatsError>())
}
