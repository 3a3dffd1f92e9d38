pub mod models;
pub mod performance;

pub use models::{
    Match, MatchId, MatchSummary, Membership, Player, PlayerId, SetScores, Team, TeamId,
};
pub use performance::{
    NewPerformance, Performance, PerformanceId, Position, RawCounters, SetPositions, SETS_PER_MATCH,
};
