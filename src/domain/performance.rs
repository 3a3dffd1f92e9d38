use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::models::{MatchId, PlayerId, TeamId};

pub type PerformanceId = i32;

/// Number of sets a volleyball match can last.
pub const SETS_PER_MATCH: usize = 5;

/// Court role, used both as a player's preferred position and as the
/// per-set marker on a performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "L")]
    Libero,
    #[serde(rename = "S")]
    Setter,
    #[serde(rename = "OH")]
    OutsideHitter,
    #[serde(rename = "OP")]
    Opposite,
    #[serde(rename = "MB")]
    MiddleBlocker,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Libero => "L",
            Position::Setter => "S",
            Position::OutsideHitter => "OH",
            Position::Opposite => "OP",
            Position::MiddleBlocker => "MB",
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "L" => Ok(Position::Libero),
            "S" => Ok(Position::Setter),
            "OH" => Ok(Position::OutsideHitter),
            "OP" => Ok(Position::Opposite),
            "MB" => Ok(Position::MiddleBlocker),
            other => Err(format!("Unknown position code: {}", other)),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role played in each of the five sets; `None` means the player sat that set out.
pub type SetPositions = [Option<Position>; SETS_PER_MATCH];

/// Raw statistical tallies of a single performance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCounters {
    pub serve: u32,
    pub serve_error: u32,
    pub serve_ace: u32,
    pub reception: u32,
    pub positive_reception: u32,
    pub reception_error: u32,
    pub spike: u32,
    pub spike_point: u32,
    pub spike_block: u32,
    pub spike_error: u32,
    pub block_amount: u32,
    pub dig: u32,
}

/// One player's statistics for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub id: PerformanceId,
    pub player_id: PlayerId,
    pub match_id: MatchId,
    pub team_id: TeamId,
    pub set_positions: SetPositions,
    #[serde(flatten)]
    pub counters: RawCounters,
}

impl Performance {
    /// Number of sets this player actually appeared in.
    pub fn sets_played(&self) -> usize {
        self.set_positions.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Incoming performance data before it has been stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPerformance {
    pub player_id: PlayerId,
    pub match_id: MatchId,
    pub team_id: TeamId,
    #[serde(default)]
    pub set_positions: SetPositions,
    #[serde(flatten)]
    pub counters: RawCounters,
}
