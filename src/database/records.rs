use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::domain::PlayerId;
use crate::errors::StatsError;
use crate::stats::{PlayerRecord, RecordCategory, RecordEntry};

/// `serve, serve_match_id, serve_error, serve_error_match_id, ...`
fn category_columns() -> Vec<String> {
    RecordCategory::ALL
        .iter()
        .flat_map(|category| [category.as_str().to_string(), format!("{}_match_id", category)])
        .collect()
}

fn select_sql(condition: &str) -> String {
    format!(
        "SELECT player_id, {} FROM player_records {}",
        category_columns().join(", "),
        condition
    )
}

fn parse_record_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerRecord> {
    let mut entries = [RecordEntry::default(); 10];
    for (i, entry) in entries.iter_mut().enumerate() {
        *entry = RecordEntry {
            amount: row.get(1 + 2 * i)?,
            match_id: row.get(2 + 2 * i)?,
        };
    }
    Ok(PlayerRecord::from_entries(row.get(0)?, entries))
}

pub fn find_by_player(conn: &Connection, player_id: PlayerId) -> Result<Option<PlayerRecord>> {
    conn.query_row(&select_sql("WHERE player_id = ?1"), params![player_id], parse_record_row)
        .optional()
        .context("Failed to query player record")
}

fn insert_empty(conn: &Connection, player_id: PlayerId) -> Result<PlayerRecord> {
    conn.execute("INSERT INTO player_records (player_id) VALUES (?1)", params![player_id])
        .with_context(|| format!("Failed to create record for player {}", player_id))?;

    Ok(PlayerRecord::new(player_id))
}

/// Loads the player's record, creating an all-zero one on first use.
pub fn get_or_create(conn: &Connection, player_id: PlayerId) -> Result<PlayerRecord> {
    match find_by_player(conn, player_id)? {
        Some(record) => Ok(record),
        None => {
            log::info!("Creating record ledger for player {}", player_id);
            insert_empty(conn, player_id)
        }
    }
}

/// Writes all ten categories in one statement.
pub fn save_record(conn: &Connection, record: &PlayerRecord) -> Result<()> {
    let assignments = category_columns()
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ?{}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE player_records SET {}, updated_at = CURRENT_TIMESTAMP WHERE player_id = ?{}",
        assignments,
        RecordCategory::ALL.len() * 2 + 1
    );

    let mut values = Vec::with_capacity(RecordCategory::ALL.len() * 2 + 1);
    for (_, entry) in record.entries() {
        values.push(Value::Integer(entry.amount.into()));
        values.push(match entry.match_id {
            Some(id) => Value::Integer(id.into()),
            None => Value::Null,
        });
    }
    values.push(Value::Integer(record.player_id.into()));

    let updated = conn
        .execute(&sql, params_from_iter(values.iter()))
        .with_context(|| format!("Failed to save record for player {}", record.player_id))?;

    if updated != 1 {
        return Err(StatsError::InconsistentState(format!(
            "record row for player {} is missing",
            record.player_id
        ))
        .into());
    }
    Ok(())
}

pub fn list_all(conn: &Connection) -> Result<Vec<PlayerRecord>> {
    let mut stmt = conn.prepare(&select_sql("ORDER BY player_id"))?;
    let rows = stmt
        .query_map([], parse_record_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
