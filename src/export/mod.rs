//! Export: CSV download and structured JSON reports over a transaction set.

mod core;
mod csv_endpoint;
mod report_endpoint;

pub use core::{CategoryShare, Report, ReportPeriod, ReportRow, ReportSummary, build_report, to_csv};
pub use csv_endpoint::export_csv_endpoint;
pub use report_endpoint::export_report_endpoint;
