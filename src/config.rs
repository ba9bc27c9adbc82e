use crate::analysis::DATE_FORMAT;
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// VictorOps API access
    pub victorops: VictorOpsConfig,

    /// Work-hours window and holidays
    #[validate(nested)]
    pub work_time: WorkTimeConfig,

    /// Reporting period
    #[serde(default)]
    pub period: PeriodConfig,

    /// Report rendering
    pub report: ReportConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from defaults, an optional file and environment.
    ///
    /// Sources are layered: built-in defaults, then the file given as
    /// `path` (or the `CONFIG_PATH` env var, or `config.toml` in the
    /// working directory), then environment variables with the `IR`
    /// prefix (e.g. `IR__VICTOROPS__API_KEY`).
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            include_str!("../config/default.toml"),
            config::FileFormat::Toml,
        ));

        builder = match path {
            Some(path) => builder.add_source(config::File::with_name(path).required(true)),
            None => {
                let fallback =
                    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
                builder.add_source(config::File::with_name(&fallback).required(false))
            }
        };

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix("IR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VictorOpsConfig {
    /// API application id (`X-VO-Api-Id`)
    pub api_id: String,

    /// API key (`X-VO-Api-Key`)
    pub api_key: String,

    /// Routing key selecting the incident stream to query
    pub routing_key: String,

    /// Client display name used in the rendered document
    #[serde(default = "default_client_name")]
    pub client_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WorkTimeConfig {
    /// First in-work clock hour (24h local time)
    #[serde(default = "default_start_hour")]
    #[validate(range(min = 0, max = 23))]
    pub start_hour: u32,

    /// Last in-work clock hour (24h local time, inclusive)
    #[serde(default = "default_end_hour")]
    #[validate(range(min = 0, max = 23))]
    pub end_hour: u32,

    /// Comma-delimited DD.MM.YYYY holiday dates
    #[serde(default)]
    pub holidays: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodConfig {
    /// Period start date (DD.MM.YYYY)
    pub start_date: Option<String>,

    /// Period end date (DD.MM.YYYY); "now" when unset
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Custom template path; the built-in template when unset
    pub template: Option<PathBuf>,

    /// Output document path
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

/// Parse a period date in DD.MM.YYYY format
pub fn parse_review_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        AppError::Validation(format!(
            "Incorrect date '{}'. Provide dates in format DD.MM.YYYY",
            value
        ))
    })
}

// Default value functions
fn default_client_name() -> String {
    "On-Call Team".to_string()
}

fn default_start_hour() -> u32 {
    9
}

fn default_end_hour() -> u32 {
    17
}

fn default_output() -> PathBuf {
    PathBuf::from("incident-review.md")
}

fn default_log_level() -> String {
    "warn".to_string()
}
