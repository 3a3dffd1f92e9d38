use serde::{Deserialize, Serialize};

use super::metrics::{
    positive_reception_percentage, round_ratio, spike_efficiency, spike_kill_percentage,
    total_score, total_score_balance, CounterTotals,
};
use crate::domain::Performance;

/// Averaged statistics over a set of performances.
///
/// Counter fields and the two score fields are `sum / divisor`; the three
/// percentage fields come from the summed totals and are never divided.
/// Everything is rounded half-up to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub total_score: f64,
    pub total_score_balance: f64,
    pub serve: f64,
    pub serve_error: f64,
    pub serve_ace: f64,
    pub reception: f64,
    pub positive_reception: f64,
    pub reception_error: f64,
    pub positive_reception_percentage: f64,
    pub spike: f64,
    pub spike_point: f64,
    pub spike_block: f64,
    pub spike_error: f64,
    pub spike_kill_percentage: f64,
    pub spike_efficiency: f64,
    pub block_amount: f64,
    pub dig: f64,
}

impl AggregateReport {
    /// The report returned for an empty performance set.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// How the averaging denominator is chosen for a set of performances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Divisor {
    /// One unit per performance
    Performances,
    /// One unit per set the player actually appeared in
    SetsPlayed,
}

impl Divisor {
    pub fn resolve(&self, performances: &[Performance]) -> u64 {
        match self {
            Divisor::Performances => performances.len() as u64,
            Divisor::SetsPlayed => count_sets(performances) as u64,
        }
    }
}

/// Total number of non-empty set-position slots across all performances.
pub fn count_sets(performances: &[Performance]) -> usize {
    performances.iter().map(Performance::sets_played).sum()
}

pub fn aggregate(performances: &[Performance], divisor: u64) -> AggregateReport {
    if performances.is_empty() {
        return AggregateReport::zero();
    }

    let totals = sum_counters(performances);
    build_report(&totals, divisor as i64)
}

fn sum_counters(performances: &[Performance]) -> CounterTotals {
    let mut totals = CounterTotals::default();
    for performance in performances {
        totals.add(&performance.counters);
    }
    totals
}

fn build_report(t: &CounterTotals, divisor: i64) -> AggregateReport {
    let avg = |sum: i64| average(sum, divisor);

    AggregateReport {
        total_score: avg(total_score(t.serve_ace, t.spike_point, t.block_amount)),
        total_score_balance: avg(total_score_balance(t)),
        serve: avg(t.serve),
        serve_error: avg(t.serve_error),
        serve_ace: avg(t.serve_ace),
        reception: avg(t.reception),
        positive_reception: avg(t.positive_reception),
        reception_error: avg(t.reception_error),
        positive_reception_percentage: positive_reception_percentage(
            t.positive_reception,
            t.reception,
        ) as f64,
        spike: avg(t.spike),
        spike_point: avg(t.spike_point),
        spike_block: avg(t.spike_block),
        spike_error: avg(t.spike_error),
        spike_kill_percentage: spike_kill_percentage(t.spike_point, t.spike) as f64,
        spike_efficiency: spike_efficiency(
            t.spike_point,
            t.spike_error,
            t.spike_block,
            t.spike,
        ) as f64,
        block_amount: avg(t.block_amount),
        dig: avg(t.dig),
    }
}

/// `sum / divisor` rounded half-up to two decimals; zero when the divisor is zero.
fn average(sum: i64, divisor: i64) -> f64 {
    round_ratio(sum, divisor, 100) as f64 / 100.0
}
