use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize, Serializer};
use strum::{Display, EnumString};

/// Sentinel used when the source data lacks an identifier
pub const NA: &str = "NA";

/// Lifecycle transition names recognized in source data.
///
/// Any other transition name is ignored during ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TransitionName {
    Triggered,
    Acknowledged,
    Resolved,
}

/// One incident lifecycle as fetched from the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Incident number, `"NA"` when absent upstream
    pub incident_number: String,

    /// Alerting entity identifier, `"NA"` when absent upstream
    pub entity_id: String,

    /// Instant the incident was triggered, in local time.
    /// `None` when the source data has no `triggered` transition;
    /// never defaulted or synthesized.
    pub triggered_at: Option<DateTime<Local>>,

    /// Instant the incident was first acknowledged, in local time
    pub acknowledged_at: Option<DateTime<Local>>,

    /// Instant the incident was resolved, in local time
    pub resolved_at: Option<DateTime<Local>>,
}

impl IncidentRecord {
    /// Create a record with no lifecycle timestamps
    pub fn new(incident_number: String, entity_id: String) -> Self {
        Self {
            incident_number,
            entity_id,
            triggered_at: None,
            acknowledged_at: None,
            resolved_at: None,
        }
    }

    /// Set the timestamp for a lifecycle transition
    pub fn set_transition(&mut self, name: TransitionName, at: DateTime<Local>) {
        match name {
            TransitionName::Triggered => self.triggered_at = Some(at),
            TransitionName::Acknowledged => self.acknowledged_at = Some(at),
            TransitionName::Resolved => self.resolved_at = Some(at),
        }
    }
}

/// An incident after analysis.
///
/// Produced by `IncidentAnalyzer::annotate`; a distinct type so that
/// summarization can only ever see analyzed records. All three derived
/// fields are `None` when the record has no trigger timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedIncident {
    /// The record as fetched
    #[serde(flatten)]
    pub record: IncidentRecord,

    /// Time to acknowledge: acknowledged - triggered
    #[serde(serialize_with = "serialize_opt_duration_secs")]
    pub tta: Option<Duration>,

    /// Time to resolve: resolved - triggered
    #[serde(serialize_with = "serialize_opt_duration_secs")]
    pub ttr: Option<Duration>,

    /// Whether the incident was triggered inside the work-hours window
    pub in_work_hours: Option<bool>,
}

/// Serialize an optional duration as whole seconds
fn serialize_opt_duration_secs<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(duration) => serializer.serialize_some(&duration.num_seconds()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_transition_name_parsing() {
        assert_eq!(
            "triggered".parse::<TransitionName>().unwrap(),
            TransitionName::Triggered
        );
        assert_eq!(
            "acknowledged".parse::<TransitionName>().unwrap(),
            TransitionName::Acknowledged
        );
        assert_eq!(
            "resolved".parse::<TransitionName>().unwrap(),
            TransitionName::Resolved
        );
        assert!("escalated".parse::<TransitionName>().is_err());
    }

    #[test]
    fn test_set_transition() {
        let mut record = IncidentRecord::new("1234".to_string(), NA.to_string());
        let at = Local.with_ymd_and_hms(2023, 12, 18, 10, 0, 0).unwrap();

        record.set_transition(TransitionName::Triggered, at);

        assert_eq!(record.triggered_at, Some(at));
        assert!(record.acknowledged_at.is_none());
        assert!(record.resolved_at.is_none());
    }

    #[test]
    fn test_annotated_incident_serialization() {
        let mut record = IncidentRecord::new("42".to_string(), "host-1".to_string());
        let triggered = Local.with_ymd_and_hms(2023, 12, 18, 10, 0, 0).unwrap();
        record.set_transition(TransitionName::Triggered, triggered);

        let annotated = AnnotatedIncident {
            record,
            tta: Some(Duration::minutes(5)),
            ttr: None,
            in_work_hours: Some(true),
        };

        let json = serde_json::to_value(&annotated).unwrap();
        assert_eq!(json["incident_number"], "42");
        assert_eq!(json["tta"], 300);
        assert!(json["ttr"].is_null());
        assert_eq!(json["in_work_hours"], true);
    }
}
