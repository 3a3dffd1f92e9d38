use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::performance::{Position, SETS_PER_MATCH};

pub type PlayerId = i32;
pub type TeamId = i32;
pub type MatchId = i32;

/// Player data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub nick: Option<String>,
    pub year_of_birth: i32,
    /// Height in centimetres
    pub height: i32,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: Option<f64>,
    pub position: Position,
}

/// Team data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Player's spell at a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub date_joined: NaiveDate,
    #[serde(default)]
    pub date_left: Option<NaiveDate>,
}

/// Points scored by each side in every set (unplayed sets stay at 0)
pub type SetScores = [u16; SETS_PER_MATCH];

/// Match between two teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub time: NaiveDateTime,
    #[serde(default)]
    pub home_scores: SetScores,
    #[serde(default)]
    pub away_scores: SetScores,
}

/// Match as shown next to records and performances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: MatchId,
    pub home_team_id: TeamId,
    pub home_team_name: String,
    pub away_team_id: TeamId,
    pub away_team_name: String,
    pub time: NaiveDateTime,
    pub home_scores: SetScores,
    pub away_scores: SetScores,
}
