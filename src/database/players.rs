use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{Player, PlayerId};

const PLAYER_COLUMNS: &str = "id, name, surname, nick, year_of_birth, height, weight, position";

pub fn insert_player(conn: &Connection, player: &Player) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players ({PLAYER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
         RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            player.id,
            player.name,
            player.surname,
            player.nick,
            player.year_of_birth,
            player.height,
            player.weight,
            player.position.as_str(),
        ],
        parse_player_row,
    )
    .with_context(|| format!("Failed to insert player {}", player.id))
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    let position: String = row.get(7)?;
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        surname: row.get(2)?,
        nick: row.get(3)?,
        year_of_birth: row.get(4)?,
        height: row.get(5)?,
        weight: row.get(6)?,
        position: super::parse_position(7, &position)?,
    })
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn exists(conn: &Connection, id: PlayerId) -> Result<bool> {
    let sql = "SELECT EXISTS(SELECT 1 FROM players WHERE id = ?1)";

    conn.query_row(sql, params![id], |row| row.get(0))
        .context("Failed to check player existence")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Position;
    use crate::fixtures::{self, TestDb};

    #[test]
    fn test_insert_and_find_player() {
        let db = TestDb::empty();
        let conn = db.conn();
        let mut libero = fixtures::player(5, "Zofia", Position::Libero);
        libero.nick = Some("Zosia".to_string());
        libero.weight = Some(61.5);

        let stored = insert_player(&conn, &libero).unwrap();

        assert_eq!(stored, libero);
        assert_eq!(find_by_id(&conn, 5).unwrap(), Some(libero));
        assert!(exists(&conn, 5).unwrap());
        assert_eq!(find_by_id(&conn, 6).unwrap(), None);
    }

    #[test]
    fn test_list_all_orders_by_id() {
        let db = TestDb::seeded();

        let ids: Vec<_> = list_all(&db.conn()).unwrap().iter().map(|p| p.id).collect();

        assert_eq!(ids, vec![fixtures::PLAYER_ID, fixtures::TEAMMATE_ID]);
    }
}
