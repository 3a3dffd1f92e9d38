use serde::{Deserialize, Serialize};

use crate::domain::RawCounters;

/// Composite values derived from a single performance's raw counters.
///
/// Percentages are whole numbers, rounded half-up. Every ratio falls back to
/// zero when its denominator counter is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub total_score: i64,
    pub total_score_balance: i64,
    pub positive_reception_percentage: i64,
    pub spike_kill_percentage: i64,
    pub spike_efficiency: i64,
}

pub fn compute_derived(counters: &RawCounters) -> DerivedMetrics {
    let c = widen(counters);

    DerivedMetrics {
        total_score: total_score(c.serve_ace, c.spike_point, c.block_amount),
        total_score_balance: total_score_balance(&c),
        positive_reception_percentage: positive_reception_percentage(
            c.positive_reception,
            c.reception,
        ),
        spike_kill_percentage: spike_kill_percentage(c.spike_point, c.spike),
        spike_efficiency: spike_efficiency(c.spike_point, c.spike_error, c.spike_block, c.spike),
    }
}

/// Counters widened to `i64` so sums and differences never overflow or wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterTotals {
    pub serve: i64,
    pub serve_error: i64,
    pub serve_ace: i64,
    pub reception: i64,
    pub positive_reception: i64,
    pub reception_error: i64,
    pub spike: i64,
    pub spike_point: i64,
    pub spike_block: i64,
    pub spike_error: i64,
    pub block_amount: i64,
    pub dig: i64,
}

impl CounterTotals {
    pub fn add(&mut self, counters: &RawCounters) {
        let c = widen(counters);
        self.serve += c.serve;
        self.serve_error += c.serve_error;
        self.serve_ace += c.serve_ace;
        self.reception += c.reception;
        self.positive_reception += c.positive_reception;
        self.reception_error += c.reception_error;
        self.spike += c.spike;
        self.spike_point += c.spike_point;
        self.spike_block += c.spike_block;
        self.spike_error += c.spike_error;
        self.block_amount += c.block_amount;
        self.dig += c.dig;
    }
}

fn widen(counters: &RawCounters) -> CounterTotals {
    CounterTotals {
        serve: counters.serve.into(),
        serve_error: counters.serve_error.into(),
        serve_ace: counters.serve_ace.into(),
        reception: counters.reception.into(),
        positive_reception: counters.positive_reception.into(),
        reception_error: counters.reception_error.into(),
        spike: counters.spike.into(),
        spike_point: counters.spike_point.into(),
        spike_block: counters.spike_block.into(),
        spike_error: counters.spike_error.into(),
        block_amount: counters.block_amount.into(),
        dig: counters.dig.into(),
    }
}

pub(crate) fn total_score(serve_ace: i64, spike_point: i64, block_amount: i64) -> i64 {
    serve_ace + spike_point + block_amount
}

pub(crate) fn total_score_balance(c: &CounterTotals) -> i64 {
    total_score(c.serve_ace, c.spike_point, c.block_amount)
        - c.serve_error
        - c.reception_error
        - c.spike_error
        - c.spike_block
}

pub(crate) fn positive_reception_percentage(positive_reception: i64, reception: i64) -> i64 {
    round_ratio(positive_reception, reception, 100)
}

pub(crate) fn spike_kill_percentage(spike_point: i64, spike: i64) -> i64 {
    round_ratio(spike_point, spike, 100)
}

pub(crate) fn spike_efficiency(
    spike_point: i64,
    spike_error: i64,
    spike_block: i64,
    spike: i64,
) -> i64 {
    round_ratio(spike_point - spike_error - spike_block, spike, 100)
}

/// `round(numerator / denominator * scale)`, half-up, in exact integer math.
///
/// Returns 0 for a non-positive denominator.
pub(crate) fn round_ratio(numerator: i64, denominator: i64, scale: i64) -> i64 {
    if denominator <= 0 {
        return 0;
    }
    (2 * numerator * scale + denominator).div_euclid(2 * denominator)
}
