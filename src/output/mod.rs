//! Run outputs: the final report and the per-fetch log file

mod fetch_log;
mod report;

pub use fetch_log::FetchLog;
pub use report::MirrorReport;
