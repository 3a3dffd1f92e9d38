use anyhow::{Context, Result};
use log::info;
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::recording::store_performance;
use crate::database::{self, DbPool};
use crate::domain::{Match, Membership, NewPerformance, Player, Team};
use crate::errors::StatsError;

/// Contents of a roster file, in dependency order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub performances: Vec<NewPerformance>,
}

impl Roster {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse roster file {}", path.display()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub players: usize,
    pub teams: usize,
    pub memberships: usize,
    pub matches: usize,
    pub performances: usize,
    pub records_broken: usize,
}

pub struct ImportService {
    pool: DbPool,
}

impl ImportService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Imports the whole roster in one transaction: a failure anywhere leaves
    /// the database as it was.
    pub fn run(&self, roster: &Roster) -> Result<ImportSummary> {
        info!("=== Starting Roster Import ===");
        validate_matches(&roster.matches)?;

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to begin import transaction")?;

        // Step 1: Entities performances refer to
        import_entities(&tx, roster)?;
        info!(
            "  → Stored {} players, {} teams, {} matches",
            roster.players.len(),
            roster.teams.len(),
            roster.matches.len()
        );

        // Step 2: Performances, each updating records
        let records_broken = import_performances(&tx, &roster.performances)?;
        info!(
            "  → Recorded {} performances, {} records broken",
            roster.performances.len(),
            records_broken
        );

        tx.commit().context("Failed to commit roster import")?;

        info!("=== Import Complete ===");
        Ok(ImportSummary {
            players: roster.players.len(),
            teams: roster.teams.len(),
            memberships: roster.memberships.len(),
            matches: roster.matches.len(),
            performances: roster.performances.len(),
            records_broken,
        })
    }
}

fn import_entities(conn: &Connection, roster: &Roster) -> Result<()> {
    for team in &roster.teams {
        database::teams::insert_team(conn, team)?;
    }
    for player in &roster.players {
        database::players::insert_player(conn, player)?;
    }
    for membership in &roster.memberships {
        database::teams::insert_membership(conn, membership)?;
    }
    for game in &roster.matches {
        database::matches::insert_match(conn, game)?;
    }
    Ok(())
}

fn import_performances(conn: &Connection, performances: &[NewPerformance]) -> Result<usize> {
    let mut broken = 0;
    for (idx, performance) in performances.iter().enumerate() {
        let recorded = store_performance(conn, performance).with_context(|| {
            format!(
                "Performance #{} could not be recorded, nothing was imported",
                idx + 1
            )
        })?;
        broken += recorded.broken_records.len();
    }
    Ok(broken)
}

fn validate_matches(matches: &[Match]) -> Result<()> {
    if let Some(game) = matches.iter().find(|m| m.home_team_id == m.away_team_id) {
        return Err(StatsError::InvalidInput(format!(
            "match {} has team {} on both sides",
            game.id, game.home_team_id
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::find_stats_error;
    use crate::domain::Position;
    use crate::fixtures::TestDb;
    use crate::stats::RecordCategory;
    use std::io::Write;

    const ROSTER: &str = r#"{
        "teams": [
            {"id": 1, "name": "Lions"},
            {"id": 2, "name": "Hawks", "description": "Away side"}
        ],
        "players": [
            {
                "id": 7, "name": "Ola", "surname": "Nowak",
                "year_of_birth": 2000, "height": 178, "position": "OH"
            }
        ],
        "memberships": [
            {"player_id": 7, "team_id": 1, "date_joined": "2023-09-01"}
        ],
        "matches": [
            {
                "id": 1, "home_team_id": 1, "away_team_id": 2, "time": "2024-01-06T18:00:00",
                "home_scores": [25, 25, 25, 0, 0], "away_scores": [20, 21, 19, 0, 0]
            },
            {"id": 2, "home_team_id": 2, "away_team_id": 1, "time": "2024-01-13T18:00:00"}
        ],
        "performances": [
            {
                "player_id": 7, "match_id": 1, "team_id": 1,
                "set_positions": ["OH", "OH", null, null, null],
                "serve": 5, "spike": 3, "spike_point": 1
            },
            {
                "player_id": 7, "match_id": 2, "team_id": 1,
                "serve": 3, "spike": 4, "spike_point": 2, "spike_error": 1
            }
        ]
    }"#;

    #[test]
    fn test_load_reads_roster_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ROSTER.as_bytes()).unwrap();

        let roster = Roster::load(file.path()).unwrap();

        assert_eq!(roster.teams.len(), 2);
        assert_eq!(
            roster.performances[0].set_positions[1],
            Some(Position::OutsideHitter)
        );
        assert_eq!(roster.performances[1].counters.spike_error, 1);
    }

    #[test]
    fn test_import_records_performances_in_file_order() {
        let db = TestDb::empty();
        let roster: Roster = serde_json::from_str(ROSTER).unwrap();

        let summary = ImportService::new(db.pool.clone()).run(&roster).unwrap();

        assert_eq!(summary.performances, 2);
        // serve, spike and spike_point, then spike and spike_point again
        assert_eq!(summary.records_broken, 5);

        let record = database::records::find_by_player(&db.conn(), 7)
            .unwrap()
            .unwrap();
        assert_eq!(record.entry(RecordCategory::Serve).match_id, Some(1));
        assert_eq!(record.entry(RecordCategory::SpikePoint).match_id, Some(2));
    }

    #[test]
    fn test_match_against_itself_is_rejected() {
        let db = TestDb::empty();
        let mut roster: Roster = serde_json::from_str(ROSTER).unwrap();
        roster.matches[1].away_team_id = 2;

        let err = ImportService::new(db.pool.clone()).run(&roster).unwrap_err();

        assert!(matches!(find_stats_error(&err), Some(StatsError::InvalidInput(_))));
        assert!(database::players::list_all(&db.conn()).unwrap().is_empty());
    }

    #[test]
    fn test_bad_performance_rolls_back_whole_import() {
        let db = TestDb::empty();
        let mut roster: Roster = serde_json::from_str(ROSTER).unwrap();
        roster.performances[1].match_id = 3;

        let err = ImportService::new(db.pool.clone()).run(&roster).unwrap_err();

        assert!(format!("{err:#}").contains("Performance #2"));
        assert!(matches!(
            find_stats_error(&err),
            Some(StatsError::NotFound { entity: "Match", id: 3 })
        ));
        let conn = db.conn();
        assert!(database::players::list_all(&conn).unwrap().is_empty());
        assert_eq!(database::records::find_by_player(&conn, 7).unwrap(), None);
        assert_eq!(
            database::performances::list(&conn, &database::PerformanceFilter::new())
                .unwrap()
                .len(),
            0
        );
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let roster: Roster =
            serde_json::from_str(r#"{"teams": [{"id": 3, "name": "Owls"}]}"#).unwrap();

        assert_eq!(roster.teams.len(), 1);
        assert!(roster.players.is_empty());
        assert!(roster.performances.is_empty());
    }
}
