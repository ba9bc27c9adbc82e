//! Per-incident annotation and batch aggregation

use crate::analysis::error::AnalysisResult;
use crate::analysis::policy::WorkHoursPolicy;
use crate::analysis::summary::{StatisticalSummary, UNCLASSIFIED_COUNTS_AS_IN_WORK_HOURS};
use crate::models::{AnnotatedIncident, IncidentRecord};
use chrono::Duration;
use tracing::debug;

/// Derives response-time metrics and work-hours classification for a
/// batch of incidents.
pub struct IncidentAnalyzer {
    policy: WorkHoursPolicy,
}

impl IncidentAnalyzer {
    /// Create an analyzer for the given work-hours window and holiday list.
    ///
    /// Fails when any holiday entry is malformed, before any analysis
    /// starts.
    pub fn new(start_hour: u32, end_hour: u32, holidays: &str) -> AnalysisResult<Self> {
        Ok(Self {
            policy: WorkHoursPolicy::new(start_hour, end_hour, holidays)?,
        })
    }

    /// Create an analyzer from an existing policy
    pub fn with_policy(policy: WorkHoursPolicy) -> Self {
        Self { policy }
    }

    /// The classification policy in effect
    pub fn policy(&self) -> &WorkHoursPolicy {
        &self.policy
    }

    /// Annotate a batch of incidents with TTA, TTR and the work-hours flag.
    ///
    /// Returns a new list of the same length and order. Records without a
    /// trigger timestamp pass through with all derived fields `None`;
    /// incomplete records are expected, not an error.
    pub fn annotate(&self, incidents: Vec<IncidentRecord>) -> Vec<AnnotatedIncident> {
        incidents
            .into_iter()
            .map(|record| self.annotate_one(record))
            .collect()
    }

    fn annotate_one(&self, record: IncidentRecord) -> AnnotatedIncident {
        let (tta, ttr, in_work_hours) = match record.triggered_at {
            None => {
                debug!(
                    incident_number = %record.incident_number,
                    "Incident has no trigger timestamp, skipping annotation"
                );
                (None, None, None)
            }
            Some(triggered_at) => (
                record.acknowledged_at.map(|at| at - triggered_at),
                record.resolved_at.map(|at| at - triggered_at),
                Some(self.policy.is_in_work_hours(&triggered_at)),
            ),
        };

        AnnotatedIncident {
            record,
            tta,
            ttr,
            in_work_hours,
        }
    }

    /// Aggregate an annotated batch into a statistical summary.
    ///
    /// Pure: no mutation of the input. Mean TTA/TTR are taken over the
    /// incidents that have the respective metric; with zero qualifying
    /// incidents the mean is reported as `None` rather than failing.
    pub fn summarize(&self, incidents: &[AnnotatedIncident]) -> StatisticalSummary {
        let ttas: Vec<Duration> = incidents.iter().filter_map(|i| i.tta).collect();
        let ttrs: Vec<Duration> = incidents.iter().filter_map(|i| i.ttr).collect();

        let in_work_hours_count = incidents
            .iter()
            .filter(|i| {
                i.in_work_hours
                    .unwrap_or(UNCLASSIFIED_COUNTS_AS_IN_WORK_HOURS)
            })
            .count();

        StatisticalSummary {
            count: incidents.len(),
            mtta: mean_duration(&ttas),
            mttr: mean_duration(&ttrs),
            in_work_hours_count,
        }
    }
}

/// Arithmetic mean with millisecond precision; `None` for an empty set
fn mean_duration(durations: &[Duration]) -> Option<Duration> {
    if durations.is_empty() {
        return None;
    }

    let total_ms: i64 = durations.iter().map(|d| d.num_milliseconds()).sum();
    Some(Duration::milliseconds(total_ms / durations.len() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};

    fn analyzer() -> IncidentAnalyzer {
        IncidentAnalyzer::new(9, 17, "25.12.2023").unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn triggered_incident(number: &str, at: DateTime<Local>) -> IncidentRecord {
        IncidentRecord {
            incident_number: number.to_string(),
            entity_id: "entity-1".to_string(),
            triggered_at: Some(at),
            acknowledged_at: None,
            resolved_at: None,
        }
    }

    #[test]
    fn test_untriggered_record_passes_through_unannotated() {
        // Acknowledged and resolved, but never triggered in the source data
        let mut record = IncidentRecord::new("1".to_string(), "NA".to_string());
        record.acknowledged_at = Some(local(2023, 12, 18, 10, 5));
        record.resolved_at = Some(local(2023, 12, 18, 10, 30));

        let annotated = analyzer().annotate(vec![record.clone()]);

        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].record, record);
        assert!(annotated[0].tta.is_none());
        assert!(annotated[0].ttr.is_none());
        assert!(annotated[0].in_work_hours.is_none());
    }

    #[test]
    fn test_tta_and_ttr_are_exact_differences() {
        let triggered = local(2023, 12, 18, 10, 0);
        let mut record = triggered_incident("1", triggered);
        record.acknowledged_at = Some(triggered + Duration::minutes(5));
        record.resolved_at = Some(triggered + Duration::minutes(30));

        let annotated = analyzer().annotate(vec![record]);

        assert_eq!(annotated[0].tta, Some(Duration::minutes(5)));
        assert_eq!(annotated[0].ttr, Some(Duration::minutes(30)));
        assert_eq!(annotated[0].in_work_hours, Some(true));
    }

    #[test]
    fn test_acknowledged_without_resolution() {
        let triggered = local(2023, 12, 18, 10, 0);
        let mut record = triggered_incident("1", triggered);
        record.acknowledged_at = Some(triggered + Duration::seconds(90));

        let annotated = analyzer().annotate(vec![record]);

        assert_eq!(annotated[0].tta, Some(Duration::seconds(90)));
        assert!(annotated[0].ttr.is_none());
    }

    #[test]
    fn test_work_hour_boundaries() {
        // 2023-12-18 is a Monday
        let cases = [(8, false), (9, true), (17, true), (18, false)];

        for (hour, expected) in cases {
            let record = triggered_incident("1", local(2023, 12, 18, hour, 0));
            let annotated = analyzer().annotate(vec![record]);
            assert_eq!(
                annotated[0].in_work_hours,
                Some(expected),
                "hour {} should classify as {}",
                hour,
                expected
            );
        }
    }

    #[test]
    fn test_weekend_and_holiday_classification() {
        let saturday = triggered_incident("1", local(2023, 12, 23, 10, 0));
        let sunday = triggered_incident("2", local(2023, 12, 24, 10, 0));
        let holiday = triggered_incident("3", local(2023, 12, 25, 10, 0));

        let annotated = analyzer().annotate(vec![saturday, sunday, holiday]);

        assert_eq!(annotated[0].in_work_hours, Some(false));
        assert_eq!(annotated[1].in_work_hours, Some(false));
        assert_eq!(annotated[2].in_work_hours, Some(false));
    }

    #[test]
    fn test_annotation_is_deterministic() {
        let triggered = local(2023, 12, 18, 10, 0);
        let mut record = triggered_incident("1", triggered);
        record.acknowledged_at = Some(triggered + Duration::minutes(5));
        let batch = vec![record, IncidentRecord::new("2".to_string(), "NA".to_string())];

        let analyzer = analyzer();
        let first = analyzer.annotate(batch.clone());
        let second = analyzer.annotate(batch);

        assert_eq!(first, second);
    }

    #[test]
    fn test_summarize_means() {
        let triggered = local(2023, 12, 18, 10, 0);
        let mut a = triggered_incident("1", triggered);
        a.acknowledged_at = Some(triggered + Duration::minutes(4));
        let mut b = triggered_incident("2", triggered);
        b.acknowledged_at = Some(triggered + Duration::minutes(6));
        b.resolved_at = Some(triggered + Duration::minutes(30));

        let analyzer = analyzer();
        let annotated = analyzer.annotate(vec![a, b]);
        let summary = analyzer.summarize(&annotated);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.mtta, Some(Duration::minutes(5)));
        assert_eq!(summary.mttr, Some(Duration::minutes(30)));
    }

    #[test]
    fn test_summarize_empty_aggregates_are_absent() {
        // No incident carries an acknowledgement or resolution
        let record = triggered_incident("1", local(2023, 12, 18, 10, 0));

        let analyzer = analyzer();
        let annotated = analyzer.annotate(vec![record]);
        let summary = analyzer.summarize(&annotated);

        assert_eq!(summary.count, 1);
        assert!(summary.mtta.is_none());
        assert!(summary.mttr.is_none());
    }

    #[test]
    fn test_summarize_counts_unclassified_as_in_work_hours() {
        let unclassified = IncidentRecord::new("1".to_string(), "NA".to_string());
        let off_hours = triggered_incident("2", local(2023, 12, 18, 3, 0));

        let analyzer = analyzer();
        let annotated = analyzer.annotate(vec![unclassified, off_hours]);
        let summary = analyzer.summarize(&annotated);

        assert_eq!(summary.in_work_hours_count, 1);
    }

    #[test]
    fn test_summarize_empty_batch() {
        let analyzer = analyzer();
        let summary = analyzer.summarize(&[]);

        assert_eq!(summary.count, 0);
        assert!(summary.mtta.is_none());
        assert!(summary.mttr.is_none());
        assert_eq!(summary.in_work_hours_count, 0);
    }

    #[test]
    fn test_mean_duration_millisecond_precision() {
        let durations = [Duration::milliseconds(1500), Duration::milliseconds(2500)];
        assert_eq!(mean_duration(&durations), Some(Duration::milliseconds(2000)));
    }
}
