//! VictorOps (Splunk On-Call) reporting API client
//!
//! Fetches incident history for a routing key and date window from the
//! `/api-reporting/v2/incidents` endpoint and normalizes each entry into an
//! [`IncidentRecord`](crate::models::IncidentRecord) with local-time
//! lifecycle timestamps.

mod client;

pub use client::VictorOpsClient;
