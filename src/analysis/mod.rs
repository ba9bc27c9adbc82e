//! Incident analysis and response-time statistics
//!
//! Derives per-incident response metrics and an aggregate summary from a
//! batch of fetched incident records:
//!
//! - **TTA / TTR**: time from trigger to acknowledgement / resolution
//! - **Work-hours classification**: configured daily hour window, excluding
//!   weekends and configured holiday dates
//! - **Aggregation**: incident count, mean TTA/TTR, in-work-hours count
//!
//! Analysis is a two-stage pipeline: `annotate` turns fetched
//! [`IncidentRecord`](crate::models::IncidentRecord)s into
//! [`AnnotatedIncident`](crate::models::AnnotatedIncident)s, and `summarize`
//! aggregates those into a [`StatisticalSummary`]. Summarization only
//! accepts annotated records, so the stages cannot be run out of order.

mod analyzer;
mod error;
mod policy;
mod summary;

pub use analyzer::IncidentAnalyzer;
pub use error::{AnalysisError, AnalysisResult};
pub use policy::{WorkHoursPolicy, DATE_FORMAT};
pub use summary::{StatisticalSummary, UNCLASSIFIED_COUNTS_AS_IN_WORK_HOURS};
