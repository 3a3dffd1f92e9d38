use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::models::{PerformanceFilter, PerformanceOrder};
use crate::domain::{MatchId, NewPerformance, Performance, PlayerId, RawCounters, SetPositions};

const PERFORMANCE_COLUMNS: &str = "p.id, p.player_id, p.match_id, p.team_id, \
    p.set1_position, p.set2_position, p.set3_position, p.set4_position, p.set5_position, \
    p.serve, p.serve_error, p.serve_ace, p.reception, p.positive_reception, p.reception_error, \
    p.spike, p.spike_point, p.spike_block, p.spike_error, p.block_amount, p.dig";

const FIRST_SET_COLUMN: usize = 4;
const FIRST_COUNTER_COLUMN: usize = 9;

pub fn insert_performance(conn: &Connection, new: &NewPerformance) -> Result<Performance> {
    let sql = "INSERT INTO performances (player_id, match_id, team_id, \
        set1_position, set2_position, set3_position, set4_position, set5_position, \
        serve, serve_error, serve_ace, reception, positive_reception, reception_error, \
        spike, spike_point, spike_block, spike_error, block_amount, dig) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, \
        ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20) \
        RETURNING id";

    let sets = new.set_positions.map(|slot| slot.map(|position| position.as_str()));
    let c = &new.counters;

    let id = conn
        .query_row(
            sql,
            params![
                new.player_id,
                new.match_id,
                new.team_id,
                sets[0],
                sets[1],
                sets[2],
                sets[3],
                sets[4],
                c.serve,
                c.serve_error,
                c.serve_ace,
                c.reception,
                c.positive_reception,
                c.reception_error,
                c.spike,
                c.spike_point,
                c.spike_block,
                c.spike_error,
                c.block_amount,
                c.dig,
            ],
            |row| row.get(0),
        )
        .with_context(|| {
            format!(
                "Failed to insert performance of player {} in match {}",
                new.player_id, new.match_id
            )
        })?;

    Ok(Performance {
        id,
        player_id: new.player_id,
        match_id: new.match_id,
        team_id: new.team_id,
        set_positions: new.set_positions,
        counters: new.counters,
    })
}

fn parse_performance_row(row: &rusqlite::Row) -> rusqlite::Result<Performance> {
    Ok(Performance {
        id: row.get(0)?,
        player_id: row.get(1)?,
        match_id: row.get(2)?,
        team_id: row.get(3)?,
        set_positions: parse_set_positions(row)?,
        counters: parse_counters(row)?,
    })
}

fn parse_set_positions(row: &rusqlite::Row) -> rusqlite::Result<SetPositions> {
    let mut positions: SetPositions = [None; 5];
    for (offset, slot) in positions.iter_mut().enumerate() {
        let idx = FIRST_SET_COLUMN + offset;
        let code: Option<String> = row.get(idx)?;
        *slot = match code {
            Some(code) => Some(super::parse_position(idx, &code)?),
            None => None,
        };
    }
    Ok(positions)
}

fn parse_counters(row: &rusqlite::Row) -> rusqlite::Result<RawCounters> {
    let at = |offset: usize| row.get::<_, u32>(FIRST_COUNTER_COLUMN + offset);
    Ok(RawCounters {
        serve: at(0)?,
        serve_error: at(1)?,
        serve_ace: at(2)?,
        reception: at(3)?,
        positive_reception: at(4)?,
        reception_error: at(5)?,
        spike: at(6)?,
        spike_point: at(7)?,
        spike_block: at(8)?,
        spike_error: at(9)?,
        block_amount: at(10)?,
        dig: at(11)?,
    })
}

pub fn find_by_player_and_match(
    conn: &Connection,
    player_id: PlayerId,
    match_id: MatchId,
) -> Result<Option<Performance>> {
    let sql = format!(
        "SELECT {PERFORMANCE_COLUMNS} FROM performances p \
         WHERE p.player_id = ?1 AND p.match_id = ?2"
    );

    conn.query_row(&sql, params![player_id, match_id], parse_performance_row)
        .optional()
        .context("Failed to query performance by player and match")
}

pub fn list(conn: &Connection, filter: &PerformanceFilter) -> Result<Vec<Performance>> {
    let (sql, values) = build_list_query(filter);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), parse_performance_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list performances")?;

    Ok(rows)
}

fn build_list_query(filter: &PerformanceFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    let id_filters = [
        ("p.player_id", filter.player_id),
        ("p.team_id", filter.team_id),
        ("p.match_id", filter.match_id),
    ];
    for (column, id) in id_filters {
        if let Some(id) = id {
            values.push(Value::Integer(id.into()));
            clauses.push(format!("{} = ?{}", column, values.len()));
        }
    }

    let mut sql = format!(
        "SELECT {PERFORMANCE_COLUMNS} FROM performances p JOIN matches m ON p.match_id = m.id"
    );
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    sql.push_str(match filter.order {
        PerformanceOrder::Recorded => " ORDER BY p.id ASC",
        PerformanceOrder::NewestMatchFirst => " ORDER BY m.time DESC, p.id DESC",
    });

    if let Some(limit) = filter.limit {
        values.push(Value::Integer(limit as i64));
        sql.push_str(&format!(" LIMIT ?{}", values.len()));
    }

    (sql, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_without_filters() {
        let (sql, values) = build_list_query(&PerformanceFilter::new());

        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY p.id ASC"));
        assert!(values.is_empty());
    }

    #[test]
    fn test_list_query_numbers_parameters_in_order() {
        let filter = PerformanceFilter::new()
            .for_team(4)
            .for_match(9)
            .ordered(PerformanceOrder::NewestMatchFirst)
            .limited(Some(10));

        let (sql, values) = build_list_query(&filter);

        assert!(sql.contains("WHERE p.team_id = ?1 AND p.match_id = ?2"));
        assert!(sql.contains("ORDER BY m.time DESC"));
        assert!(sql.ends_with("LIMIT ?3"));
        assert_eq!(values, vec![Value::Integer(4), Value::Integer(9), Value::Integer(10)]);
    }
}
