use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{Match, MatchId, MatchSummary, SetScores};

pub fn insert_match(conn: &Connection, game: &Match) -> Result<Match> {
    let sql = "INSERT INTO matches \
        (id, home_team_id, away_team_id, time, home_scores, away_scores) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
        RETURNING id, home_team_id, away_team_id, time, home_scores, away_scores";

    conn.query_row(
        sql,
        params![
            game.id,
            game.home_team_id,
            game.away_team_id,
            game.time,
            encode_scores(&game.home_scores)?,
            encode_scores(&game.away_scores)?,
        ],
        parse_match_row,
    )
    .with_context(|| format!("Failed to insert match {}", game.id))
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        home_team_id: row.get(1)?,
        away_team_id: row.get(2)?,
        time: row.get(3)?,
        home_scores: decode_scores(row, 4)?,
        away_scores: decode_scores(row, 5)?,
    })
}

fn encode_scores(scores: &SetScores) -> Result<String> {
    serde_json::to_string(scores).context("Failed to encode set scores")
}

fn decode_scores(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<SetScores> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub fn find_by_id(conn: &Connection, id: MatchId) -> Result<Option<Match>> {
    let sql = "SELECT id, home_team_id, away_team_id, time, home_scores, away_scores \
        FROM matches WHERE id = ?1";

    conn.query_row(sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

/// Match joined with both team names, for display next to stats.
pub fn find_summary(conn: &Connection, id: MatchId) -> Result<Option<MatchSummary>> {
    let sql = "
        SELECT
            m.id,
            m.home_team_id,
            home.name,
            m.away_team_id,
            away.name,
            m.time,
            m.home_scores,
            m.away_scores
        FROM matches m
        JOIN teams home ON m.home_team_id = home.id
        JOIN teams away ON m.away_team_id = away.id
        WHERE m.id = ?1
    ";

    conn.query_row(sql, params![id], |row| {
        Ok(MatchSummary {
            id: row.get(0)?,
            home_team_id: row.get(1)?,
            home_team_name: row.get(2)?,
            away_team_id: row.get(3)?,
            away_team_name: row.get(4)?,
            time: row.get(5)?,
            home_scores: decode_scores(row, 6)?,
            away_scores: decode_scores(row, 7)?,
        })
    })
    .optional()
    .context("Failed to query match summary")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, TestDb};

    #[test]
    fn test_set_scores_survive_storage() {
        let db = TestDb::seeded();
        let conn = db.conn();

        let stored = find_by_id(&conn, fixtures::MATCH_IDS[0]).unwrap().unwrap();

        assert_eq!(stored, fixtures::game(fixtures::MATCH_IDS[0], 0));
        assert_eq!(find_by_id(&conn, 1).unwrap(), None);
    }

    #[test]
    fn test_summary_carries_team_names() {
        let db = TestDb::seeded();

        let summary = find_summary(&db.conn(), fixtures::MATCH_IDS[3]).unwrap().unwrap();

        assert_eq!(summary.home_team_name, "Lions");
        assert_eq!(summary.away_team_name, "Hawks");
        assert_eq!(summary.time, fixtures::match_time(3));
        assert_eq!(summary.away_scores, [20, 18, 23, 0, 0]);
    }

    #[test]
    fn test_team_cannot_play_itself() {
        let db = TestDb::seeded();
        let mut game = fixtures::game(99, 0);
        game.away_team_id = game.home_team_id;

        assert!(insert_match(&db.conn(), &game).is_err());
        assert_eq!(find_by_id(&db.conn(), 99).unwrap(), None);
    }
}
