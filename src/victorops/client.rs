use crate::error::{AppError, Result};
use crate::models::{IncidentRecord, TransitionName, NA};
use chrono::{DateTime, Local, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://api.victorops.com";
const INCIDENTS_PATH: &str = "/api-reporting/v2/incidents";

/// Reporting API page size
const PAGE_LIMIT: u32 = 200;

/// Request timeout (seconds)
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// VictorOps reporting API client
#[derive(Clone)]
pub struct VictorOpsClient {
    client: Client,
    base_url: String,
    api_id: String,
    api_key: String,
}

/// Masks the API key beyond a short prefix
impl fmt::Debug for VictorOpsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_prefix: String = self.api_key.chars().take(5).collect();
        write!(f, "VictorOpsClient({}, {}****)", self.api_id, key_prefix)
    }
}

impl VictorOpsClient {
    /// Create a client authenticating with an application id and API key
    pub fn new(api_id: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_id: api_id.into(),
            api_key: api_key.into(),
        })
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch incidents for a routing key whose trigger time falls inside
    /// the given date window.
    ///
    /// `started_before` defaults to "now" when absent. Returned records
    /// carry `"NA"` identifiers where the source data lacks them, and only
    /// the lifecycle timestamps present in the source transitions.
    pub async fn fetch_incidents(
        &self,
        routing_key: &str,
        started_after: NaiveDate,
        started_before: Option<NaiveDate>,
    ) -> Result<Vec<IncidentRecord>> {
        let started_before = match started_before {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => Local::now().to_rfc3339(),
        };
        let started_after = started_after.format("%Y-%m-%d").to_string();
        let limit = PAGE_LIMIT.to_string();

        debug!(
            routing_key,
            started_after, started_before, "Requesting incident history"
        );

        let response = self
            .client
            .get(format!("{}{}", self.base_url, INCIDENTS_PATH))
            .header("X-VO-Api-Id", &self.api_id)
            .header("X-VO-Api-Key", &self.api_key)
            .query(&[
                ("routingKey", routing_key),
                ("startedAfter", started_after.as_str()),
                ("startedBefore", started_before.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(format!(
                        "Incident request timed out after {} seconds",
                        REQUEST_TIMEOUT_SECS
                    ))
                } else {
                    AppError::Network(format!("Incident request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(AppError::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    "No response body".to_string()
                } else {
                    body
                },
            });
        }

        let payload: IncidentsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Malformed incident payload: {}", e)))?;

        let incidents = payload
            .incidents
            .into_iter()
            .map(RawIncident::into_record)
            .collect::<Result<Vec<_>>>()?;

        info!(count = incidents.len(), routing_key, "Fetched incidents");

        Ok(incidents)
    }
}

#[derive(Debug, Deserialize)]
struct IncidentsResponse {
    #[serde(default)]
    incidents: Vec<RawIncident>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIncident {
    incident_number: Option<String>,
    entity_id: Option<String>,
    #[serde(default)]
    transitions: Vec<RawTransition>,
}

#[derive(Debug, Deserialize)]
struct RawTransition {
    name: Option<String>,
    at: Option<String>,
}

impl RawIncident {
    /// Normalize a raw API entry into an incident record.
    ///
    /// Unrecognized transition names are ignored; a recognized transition
    /// with a missing or malformed timestamp is a malformed response.
    fn into_record(self) -> Result<IncidentRecord> {
        let mut record = IncidentRecord::new(
            self.incident_number.unwrap_or_else(|| NA.to_string()),
            self.entity_id.unwrap_or_else(|| NA.to_string()),
        );

        for transition in self.transitions {
            let name = match transition.name.as_deref() {
                Some(name) => name.to_string(),
                None => continue,
            };
            let name: TransitionName = match name.parse() {
                Ok(name) => name,
                Err(_) => {
                    debug!(transition = %name, "Ignoring unrecognized transition");
                    continue;
                }
            };

            let at = transition.at.ok_or_else(|| {
                AppError::Serialization(format!(
                    "Transition '{}' of incident {} has no timestamp",
                    name, record.incident_number
                ))
            })?;
            let instant = parse_instant(&at)?;

            record.set_transition(name, instant);
        }

        Ok(record)
    }
}

/// Parse an RFC 3339 instant and convert it to local time
fn parse_instant(value: &str) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Local))
        .map_err(|e| AppError::Serialization(format!("Malformed transition timestamp '{}': {}", value, e)))
}
