use anyhow::{Context, Result};
use log::info;
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::database::{self, DbPool};
use crate::domain::{MatchId, NewPerformance, Performance, PlayerId, RawCounters};
use crate::errors::StatsError;
use crate::stats::{compute_derived, DerivedMetrics, PlayerRecord, RecordCategory};

/// One mutex per player, so record updates for the same player run one at a
/// time while different players proceed independently.
#[derive(Debug, Default)]
pub struct PlayerLocks {
    locks: Mutex<HashMap<PlayerId, Arc<Mutex<()>>>>,
}

impl PlayerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_for(&self, player_id: PlayerId) -> Arc<Mutex<()>> {
        // the map only hands out handles, so a poisoned lock is still usable
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(player_id).or_default())
    }
}

/// Outcome of storing a performance.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedPerformance {
    pub performance: Performance,
    pub derived: DerivedMetrics,
    pub record: PlayerRecord,
    pub broken_records: Vec<RecordCategory>,
}

#[derive(Clone)]
pub struct RecordingService {
    pool: DbPool,
    locks: Arc<PlayerLocks>,
}

impl RecordingService {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            locks: Arc::new(PlayerLocks::new()),
        }
    }

    /// Stores a performance and folds it into the player's records.
    ///
    /// Both writes share one transaction: if the record update fails the
    /// performance is not stored either.
    pub fn record_performance(&self, new: &NewPerformance) -> Result<RecordedPerformance> {
        let lock = self.locks.lock_for(new.player_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to begin performance transaction")?;

        let recorded = store_performance(&tx, new)?;

        tx.commit().context("Failed to commit performance")?;

        if !recorded.broken_records.is_empty() {
            info!(
                "Player {} set {} new record(s) in match {}: {:?}",
                new.player_id,
                recorded.broken_records.len(),
                new.match_id,
                recorded.broken_records
            );
        }

        Ok(recorded)
    }
}

/// Checks references, inserts the performance and updates the player's
/// records, all on `conn`.
///
/// The caller owns the transaction and must keep other writers for the same
/// player out until it commits.
pub fn store_performance(conn: &Connection, new: &NewPerformance) -> Result<RecordedPerformance> {
    ensure_references_valid(conn, new)?;
    ensure_not_recorded(conn, new)?;

    let performance = database::performances::insert_performance(conn, new)?;
    let (record, broken_records) =
        update_records(conn, new.player_id, new.match_id, &new.counters)?;

    Ok(RecordedPerformance {
        derived: compute_derived(&performance.counters),
        performance,
        record,
        broken_records,
    })
}

/// Load-or-create, compare all categories, persist once.
///
/// Must run inside the caller's transaction and per-player critical section.
pub fn update_records(
    conn: &Connection,
    player_id: PlayerId,
    match_id: MatchId,
    counters: &RawCounters,
) -> Result<(PlayerRecord, Vec<RecordCategory>)> {
    let mut record = database::records::get_or_create(conn, player_id)?;
    let broken = record.apply(match_id, counters);

    if !broken.is_empty() {
        database::records::save_record(conn, &record)?;
    }

    Ok((record, broken))
}

/// Player, match and team must exist, the team must be one of the two sides,
/// and the player must have been on the team when the match was played.
fn ensure_references_valid(conn: &Connection, new: &NewPerformance) -> Result<()> {
    let player = database::players::find_by_id(conn, new.player_id)?
        .ok_or_else(|| StatsError::not_found("Player", new.player_id))?;
    let game = database::matches::find_by_id(conn, new.match_id)?
        .ok_or_else(|| StatsError::not_found("Match", new.match_id))?;
    let team = database::teams::find_by_id(conn, new.team_id)?
        .ok_or_else(|| StatsError::not_found("Team", new.team_id))?;

    if team.id != game.home_team_id && team.id != game.away_team_id {
        return Err(StatsError::InvalidInput(format!(
            "{} did not play in match {}",
            team.name, game.id
        ))
        .into());
    }

    let played_on = game.time.date();
    let memberships = database::teams::list_memberships_for_player(conn, player.id)?;
    let on_team = memberships.iter().any(|membership| {
        membership.team_id == team.id
            && membership.date_joined <= played_on
            && membership.date_left.is_none_or(|left| played_on <= left)
    });
    if !on_team {
        return Err(StatsError::InvalidInput(format!(
            "{} {} was not a member of {} on {}",
            player.name, player.surname, team.name, played_on
        ))
        .into());
    }

    Ok(())
}

fn ensure_not_recorded(conn: &Connection, new: &NewPerformance) -> Result<()> {
    let existing =
        database::performances::find_by_player_and_match(conn, new.player_id, new.match_id)?;
    if existing.is_some() {
        return Err(StatsError::DuplicatePerformance {
            player: new.player_id,
            match_id: new.match_id,
        }
        .into());
    }
    Ok(())
}
