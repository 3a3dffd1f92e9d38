use anyhow::Result;
use log::debug;
use rusqlite::Connection;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

use crate::config::QuerySettings;
use crate::database::{self, DbPool, PerformanceFilter, PerformanceOrder};
use crate::domain::{MatchId, MatchSummary, Performance, PlayerId, TeamId};
use crate::errors::StatsError;
use crate::stats::{
    aggregate, compute_derived, AggregateReport, DerivedMetrics, Divisor, PlayerRecord,
};

/// Performance listed together with its derived metrics.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceView {
    #[serde(flatten)]
    pub performance: Performance,
    #[serde(flatten)]
    pub derived: DerivedMetrics,
}

impl From<Performance> for PerformanceView {
    fn from(performance: Performance) -> Self {
        let derived = compute_derived(&performance.counters);
        Self {
            performance,
            derived,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AverageSummary {
    pub report: AggregateReport,
    pub performances: usize,
    /// Sets the averages were divided by, for per-set reports only
    pub set_amount: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    pub amount: u32,
    #[serde(rename = "match")]
    pub game: Option<MatchSummary>,
}

/// A player's records with the record-setting matches resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecordsView {
    pub player_id: PlayerId,
    pub records: Vec<(&'static str, RecordView)>,
}

impl Serialize for PlayerRecordsView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len() + 1))?;
        map.serialize_entry("player_id", &self.player_id)?;
        for (category, view) in &self.records {
            map.serialize_entry(category, view)?;
        }
        map.end()
    }
}

pub struct ReportingService {
    pool: DbPool,
    settings: QuerySettings,
}

impl ReportingService {
    pub fn new(pool: DbPool, settings: QuerySettings) -> Self {
        Self { pool, settings }
    }

    /// Per-match averages over the first `amount` performances recorded for
    /// a team. An unknown team simply has no performances.
    pub fn team_average(&self, team_id: TeamId, amount: Option<usize>) -> Result<AverageSummary> {
        let conn = database::get_connection(&self.pool)?;

        let filter = PerformanceFilter::new().for_team(team_id).limited(amount);
        let performances = database::performances::list(&conn, &filter)?;
        debug!("Averaging {} performances of team {}", performances.len(), team_id);

        Ok(AverageSummary {
            report: aggregate(&performances, Divisor::Performances.resolve(&performances)),
            performances: performances.len(),
            set_amount: None,
        })
    }

    /// Per-set averages over a player's `amount` most recent matches.
    pub fn player_average(
        &self,
        player_id: PlayerId,
        amount: Option<usize>,
    ) -> Result<AverageSummary> {
        let conn = database::get_connection(&self.pool)?;
        if !database::players::exists(&conn, player_id)? {
            return Err(StatsError::not_found("Player", player_id).into());
        }

        let filter = PerformanceFilter::new()
            .for_player(player_id)
            .ordered(PerformanceOrder::NewestMatchFirst)
            .limited(amount);
        let performances = database::performances::list(&conn, &filter)?;
        let sets = Divisor::SetsPlayed.resolve(&performances);
        debug!(
            "Averaging {} performances ({} sets) of player {}",
            performances.len(),
            sets,
            player_id
        );

        Ok(AverageSummary {
            report: aggregate(&performances, sets),
            performances: performances.len(),
            set_amount: Some(sets as usize),
        })
    }

    /// Stored performances matching the filter, capped at the default amount
    /// when the filter carries no limit.
    pub fn list_performances(&self, filter: PerformanceFilter) -> Result<Vec<PerformanceView>> {
        let limit = filter.limit.unwrap_or(self.settings.default_list_amount);
        let filter = filter.limited(Some(limit));

        let conn = database::get_connection(&self.pool)?;
        let performances = database::performances::list(&conn, &filter)?;

        Ok(performances.into_iter().map(PerformanceView::from).collect())
    }

    pub fn player_records(&self, player_id: PlayerId) -> Result<PlayerRecordsView> {
        let conn = database::get_connection(&self.pool)?;
        if !database::players::exists(&conn, player_id)? {
            return Err(StatsError::not_found("Player", player_id).into());
        }

        let record = database::records::find_by_player(&conn, player_id)?
            .unwrap_or_else(|| PlayerRecord::new(player_id));
        resolve_record(&conn, &record, &mut HashMap::new())
    }

    pub fn all_records(&self) -> Result<Vec<PlayerRecordsView>> {
        let conn = database::get_connection(&self.pool)?;
        let mut summaries = HashMap::new();

        database::records::list_all(&conn)?
            .iter()
            .map(|record| resolve_record(&conn, record, &mut summaries))
            .collect()
    }
}

fn resolve_record(
    conn: &Connection,
    record: &PlayerRecord,
    summaries: &mut HashMap<MatchId, Option<MatchSummary>>,
) -> Result<PlayerRecordsView> {
    let mut records = Vec::with_capacity(10);
    for (category, entry) in record.entries() {
        let game = match entry.match_id {
            Some(id) => match summaries.get(&id) {
                Some(cached) => cached.clone(),
                None => {
                    let summary = database::matches::find_summary(conn, id)?;
                    summaries.insert(id, summary.clone());
                    summary
                }
            },
            None => None,
        };
        let view = RecordView {
            amount: entry.amount,
            game,
        };
        records.push((category.as_str(), view));
    }

    Ok(PlayerRecordsView {
        player_id: record.player_id,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewPerformance, Position, RawCounters};
    use crate::errors::find_stats_error;
    use crate::fixtures::{self, TestDb};
    use crate::services::RecordingService;

    fn record(
        db: &TestDb,
        player_id: PlayerId,
        match_id: MatchId,
        sets: usize,
        counters: RawCounters,
    ) {
        let mut set_positions = [None; 5];
        for slot in set_positions.iter_mut().take(sets) {
            *slot = Some(Position::OutsideHitter);
        }
        RecordingService::new(db.pool.clone())
            .record_performance(&NewPerformance {
                player_id,
                match_id,
                team_id: fixtures::HOME_TEAM_ID,
                set_positions,
                counters,
            })
            .unwrap();
    }

    fn spikes(serve: u32, spike: u32, spike_point: u32, spike_error: u32) -> RawCounters {
        RawCounters {
            serve,
            spike,
            spike_point,
            spike_error,
            ..RawCounters::default()
        }
    }

    fn serves(serve: u32) -> RawCounters {
        spikes(serve, 0, 0, 0)
    }

    fn digs(dig: u32) -> RawCounters {
        RawCounters {
            dig,
            ..RawCounters::default()
        }
    }

    fn service(db: &TestDb) -> ReportingService {
        ReportingService::new(db.pool.clone(), QuerySettings::default())
    }

    #[test]
    fn test_team_average_divides_by_performances() {
        let db = TestDb::seeded();
        let [m1, m2, ..] = fixtures::MATCH_IDS;
        record(&db, fixtures::PLAYER_ID, m1, 3, spikes(5, 3, 1, 0));
        record(&db, fixtures::TEAMMATE_ID, m2, 4, spikes(3, 4, 2, 1));

        let summary = service(&db).team_average(fixtures::HOME_TEAM_ID, None).unwrap();

        assert_eq!(summary.performances, 2);
        assert_eq!(summary.set_amount, None);
        assert_eq!(summary.report.serve, 4.0);
        assert_eq!(summary.report.spike, 3.5);
        assert_eq!(summary.report.spike_kill_percentage, 43.0);
        assert_eq!(summary.report.spike_efficiency, 29.0);
    }

    #[test]
    fn test_team_average_without_performances_is_zero() {
        let db = TestDb::seeded();

        let summary = service(&db).team_average(fixtures::AWAY_TEAM_ID, Some(5)).unwrap();

        assert_eq!(summary.report, AggregateReport::zero());
        assert_eq!(summary.performances, 0);
    }

    #[test]
    fn test_team_average_amount_takes_earliest_recorded() {
        let db = TestDb::seeded();
        let [m1, m2, m3, ..] = fixtures::MATCH_IDS;
        record(&db, fixtures::PLAYER_ID, m3, 3, digs(2));
        record(&db, fixtures::PLAYER_ID, m1, 3, digs(4));
        record(&db, fixtures::PLAYER_ID, m2, 3, digs(9));

        let summary = service(&db).team_average(fixtures::HOME_TEAM_ID, Some(2)).unwrap();

        assert_eq!(summary.report.dig, 3.0);
        assert_eq!(service(&db).team_average(99, None).unwrap().performances, 0);
    }

    #[test]
    fn test_player_average_uses_newest_matches_and_sets() {
        let db = TestDb::seeded();
        let [m1, m2, m3, ..] = fixtures::MATCH_IDS;
        record(&db, fixtures::PLAYER_ID, m1, 5, serves(30));
        record(&db, fixtures::PLAYER_ID, m2, 3, serves(5));
        record(&db, fixtures::PLAYER_ID, m3, 4, serves(3));

        let summary = service(&db).player_average(fixtures::PLAYER_ID, Some(2)).unwrap();

        assert_eq!(summary.performances, 2);
        assert_eq!(summary.set_amount, Some(7));
        assert_eq!(summary.report.serve, 1.14);
    }

    #[test]
    fn test_player_average_for_unknown_player_is_not_found() {
        let db = TestDb::seeded();

        let err = service(&db).player_average(42, None).unwrap_err();

        assert!(matches!(
            find_stats_error(&err),
            Some(StatsError::NotFound { entity: "Player", id: 42 })
        ));
    }

    #[test]
    fn test_list_performances_attaches_derived_metrics() {
        let db = TestDb::seeded();
        let [m1, m2, ..] = fixtures::MATCH_IDS;
        record(&db, fixtures::PLAYER_ID, m1, 3, spikes(0, 4, 2, 1));
        record(&db, fixtures::TEAMMATE_ID, m2, 3, RawCounters::default());

        let views = service(&db)
            .list_performances(PerformanceFilter::new().for_player(fixtures::PLAYER_ID))
            .unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].derived.spike_kill_percentage, 50);
        assert_eq!(views[0].derived.spike_efficiency, 25);
    }

    #[test]
    fn test_list_performances_applies_default_amount() {
        let db = TestDb::seeded();
        for match_id in fixtures::MATCH_IDS {
            record(&db, fixtures::PLAYER_ID, match_id, 3, RawCounters::default());
        }
        let settings = QuerySettings {
            default_list_amount: 4,
        };
        let service = ReportingService::new(db.pool.clone(), settings);

        assert_eq!(service.list_performances(PerformanceFilter::new()).unwrap().len(), 4);
        assert_eq!(
            service
                .list_performances(PerformanceFilter::new().limited(Some(6)))
                .unwrap()
                .len(),
            6
        );
    }

    #[test]
    fn test_player_records_resolve_matches() {
        let db = TestDb::seeded();
        let m1 = fixtures::MATCH_IDS[0];
        record(&db, fixtures::PLAYER_ID, m1, 3, digs(7));

        let view = service(&db).player_records(fixtures::PLAYER_ID).unwrap();

        let (_, dig) = view.records.iter().find(|(name, _)| *name == "dig").unwrap();
        assert_eq!(dig.amount, 7);
        let game = dig.game.as_ref().unwrap();
        assert_eq!(game.id, m1);
        assert_eq!(game.home_team_name, "Lions");

        let (_, serve) = view.records.iter().find(|(name, _)| *name == "serve").unwrap();
        assert_eq!(serve.amount, 0);
        assert_eq!(serve.game, None);
    }

    #[test]
    fn test_player_without_performances_has_empty_records() {
        let db = TestDb::seeded();

        let view = service(&db).player_records(fixtures::TEAMMATE_ID).unwrap();

        assert_eq!(view.records.len(), 10);
        assert!(view.records.iter().all(|(_, r)| r.amount == 0 && r.game.is_none()));
        assert!(service(&db).all_records().unwrap().is_empty());
    }

    #[test]
    fn test_records_view_serializes_flat() {
        let view = PlayerRecordsView {
            player_id: 3,
            records: vec![(
                "serve",
                RecordView {
                    amount: 2,
                    game: None,
                },
            )],
        };

        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"player_id": 3, "serve": {"amount": 2, "match": null}})
        );
    }
}
