//! Google Analytics Data API client and wire types.

pub mod data;
pub mod types;

// Re-export commonly used types
pub use data::{DataClient, ReportingApi};
pub use types::{Metadata, RunRealtimeReportRequest, RunReportRequest};
