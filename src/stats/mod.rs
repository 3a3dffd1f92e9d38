pub mod aggregate;
pub mod metrics;
pub mod records;

pub use aggregate::{aggregate, count_sets, AggregateReport, Divisor};
pub use metrics::{compute_derived, DerivedMetrics};
pub use records::{PlayerRecord, RecordCategory, RecordEntry};
