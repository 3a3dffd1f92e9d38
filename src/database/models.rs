use crate::domain::{MatchId, PlayerId, TeamId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PerformanceOrder {
    /// Order of entry
    #[default]
    Recorded,
    /// Most recent match first
    NewestMatchFirst,
}

#[derive(Debug, Clone, Default)]
pub struct PerformanceFilter {
    pub player_id: Option<PlayerId>,
    pub team_id: Option<TeamId>,
    pub match_id: Option<MatchId>,
    pub order: PerformanceOrder,
    pub limit: Option<usize>,
}

impl PerformanceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_player(mut self, player_id: PlayerId) -> Self {
        self.player_id = Some(player_id);
        self
    }

    pub fn for_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn for_match(mut self, match_id: MatchId) -> Self {
        self.match_id = Some(match_id);
        self
    }

    pub fn ordered(mut self, order: PerformanceOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limited(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}
