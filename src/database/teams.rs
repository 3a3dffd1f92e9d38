use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{Membership, PlayerId, Team, TeamId};

pub fn insert_team(conn: &Connection, team: &Team) -> Result<Team> {
    let sql = "INSERT INTO teams (id, name, description) VALUES (?1, ?2, ?3) \
        RETURNING id, name, description";

    conn.query_row(sql, params![team.id, team.name, team.description], parse_team_row)
        .with_context(|| format!("Failed to insert team {}", team.name))
}

fn parse_team_row(row: &rusqlite::Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

pub fn find_by_id(conn: &Connection, id: TeamId) -> Result<Option<Team>> {
    let sql = "SELECT id, name, description FROM teams WHERE id = ?1";

    conn.query_row(sql, params![id], parse_team_row)
        .optional()
        .context("Failed to query team by id")
}

pub fn insert_membership(conn: &Connection, membership: &Membership) -> Result<()> {
    let sql = "INSERT INTO memberships (player_id, team_id, date_joined, date_left) \
        VALUES (?1, ?2, ?3, ?4)";

    conn.execute(
        sql,
        params![
            membership.player_id,
            membership.team_id,
            membership.date_joined,
            membership.date_left
        ],
    )
    .with_context(|| {
        format!(
            "Failed to add player {} to team {}",
            membership.player_id, membership.team_id
        )
    })
    .map(|_| ())
}

pub fn list_memberships_for_player(
    conn: &Connection,
    player_id: PlayerId,
) -> Result<Vec<Membership>> {
    let sql = "SELECT player_id, team_id, date_joined, date_left FROM memberships \
        WHERE player_id = ?1 ORDER BY date_joined";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id], |row| {
            Ok(Membership {
                player_id: row.get(0)?,
                team_id: row.get(1)?,
                date_joined: row.get(2)?,
                date_left: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
