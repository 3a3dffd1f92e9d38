pub mod import;
pub mod recording;
pub mod reporting;
pub mod server;

pub use import::{ImportService, ImportSummary, Roster};
pub use recording::{
    store_performance, update_records, PlayerLocks, RecordedPerformance, RecordingService,
};
pub use reporting::{
    AverageSummary, PerformanceView, PlayerRecordsView, RecordView, ReportingService,
};
pub use server::ServerService;
