//! On-call incident review generator
//!
//! Fetches incident history from the VictorOps (Splunk On-Call) reporting
//! API for a configurable date range, derives response-time statistics and
//! renders them into a review document.
//!
//! # Pipeline
//!
//! Single-pass batch: fetch once, annotate once, summarize once, render
//! once.
//!
//! - [`victorops`]: reporting API client producing normalized
//!   [`models::IncidentRecord`]s
//! - [`analysis`]: TTA/TTR derivation, work-hours classification and
//!   aggregate statistics
//! - [`report`]: handlebars rendering of the review document
//!
//! # Example
//!
//! ```no_run
//! use incident_review::analysis::IncidentAnalyzer;
//! use incident_review::victorops::VictorOpsClient;
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VictorOpsClient::new("app-id", "api-key")?;
//!     let analyzer = IncidentAnalyzer::new(9, 17, "25.12.2023")?;
//!
//!     let records = client
//!         .fetch_incidents("database", NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(), None)
//!         .await?;
//!     let annotated = analyzer.annotate(records);
//!     let summary = analyzer.summarize(&annotated);
//!     println!("{} incidents", summary.count);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod victorops;

pub use config::Config;
pub use error::{AppError, Result};
