use serde::Serialize;

use crate::services::AverageSummary;
use crate::stats::AggregateReport;

#[derive(Debug, Serialize)]
pub struct AverageResponse {
    pub message: &'static str,
    pub results: AggregateReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_amount: Option<usize>,
}

impl From<AverageSummary> for AverageResponse {
    fn from(summary: AverageSummary) -> Self {
        Self {
            message: "Successfully calculated",
            results: summary.report,
            set_amount: summary.set_amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub count: usize,
    pub results: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(results: Vec<T>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}
