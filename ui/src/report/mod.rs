mod chart;
pub use chart::{bar_percent, DistributionChart};

mod compose;
pub use compose::{compose, report_filename, ReportData, REPORT_TITLE};

mod export;
pub use export::{deliver_report, DownloadGate, DownloadStatus, SETTLE_DELAY_MS};
