//! Throwaway SQLite databases for tests.

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use crate::config::DatabaseSettings;
use crate::database::{self, DbConn, DbPool};
use crate::domain::{Match, MatchId, Membership, Player, PlayerId, Position, Team, TeamId};

pub const PLAYER_ID: PlayerId = 1;
pub const TEAMMATE_ID: PlayerId = 2;
pub const HOME_TEAM_ID: TeamId = 1;
pub const AWAY_TEAM_ID: TeamId = 2;
/// Seeded matches, played one week apart in this order.
pub const MATCH_IDS: [MatchId; 6] = [11, 12, 13, 14, 15, 16];

pub struct TestDb {
    // keeps the database file alive for the pool's lifetime
    _dir: TempDir,
    pub pool: DbPool,
}

impl TestDb {
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.db");
        let settings = DatabaseSettings::default().with_path(path.to_string_lossy());
        let pool = database::create_pool(&settings).unwrap();
        database::setup::reset_database(&pool.get().unwrap()).unwrap();

        Self { _dir: dir, pool }
    }

    /// Two players on the home team, two teams, six matches.
    pub fn seeded() -> Self {
        let db = Self::empty();
        let conn = db.conn();

        for team in [team(HOME_TEAM_ID, "Lions"), team(AWAY_TEAM_ID, "Hawks")] {
            database::teams::insert_team(&conn, &team).unwrap();
        }
        for (id, name, position) in [
            (PLAYER_ID, "Anna", Position::OutsideHitter),
            (TEAMMATE_ID, "Ewa", Position::Setter),
        ] {
            database::players::insert_player(&conn, &player(id, name, position)).unwrap();
            database::teams::insert_membership(
                &conn,
                &Membership {
                    player_id: id,
                    team_id: HOME_TEAM_ID,
                    date_joined: NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
                    date_left: None,
                },
            )
            .unwrap();
        }
        for (week, id) in MATCH_IDS.iter().enumerate() {
            database::matches::insert_match(&conn, &game(*id, week as u32)).unwrap();
        }

        drop(conn);
        db
    }

    pub fn conn(&self) -> DbConn {
        self.pool.get().unwrap()
    }
}

pub fn team(id: TeamId, name: &str) -> Team {
    Team {
        id,
        name: name.to_string(),
        description: String::new(),
    }
}

pub fn player(id: PlayerId, name: &str, position: Position) -> Player {
    Player {
        id,
        name: name.to_string(),
        surname: "Kowalska".to_string(),
        nick: None,
        year_of_birth: 1998,
        height: 180,
        weight: None,
        position,
    }
}

pub fn match_time(week: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 6)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
        + chrono::Duration::weeks(week.into())
}

pub fn game(id: MatchId, week: u32) -> Match {
    Match {
        id,
        home_team_id: HOME_TEAM_ID,
        away_team_id: AWAY_TEAM_ID,
        time: match_time(week),
        home_scores: [25, 25, 25, 0, 0],
        away_scores: [20, 18, 23, 0, 0],
    }
}
